use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// An immutable sequence of program symbols.
///
/// Any text is a valid program: symbols outside the instruction alphabet are
/// skipped by the machine, so hand-written programs may carry commentary.
/// Operators never edit a `Program` in place, they build a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Program(Vec<char>);

impl Program {
    pub fn new(symbols: Vec<char>) -> Self {
        Self(symbols)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.0
    }
}

impl From<Vec<char>> for Program {
    fn from(symbols: Vec<char>) -> Self {
        Self(symbols)
    }
}

impl From<&str> for Program {
    fn from(text: &str) -> Self {
        Self(text.chars().collect())
    }
}

impl From<String> for Program {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<Program> for String {
    fn from(program: Program) -> Self {
        program.0.into_iter().collect()
    }
}

impl FromStr for Program {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.0 {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

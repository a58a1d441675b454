use crate::error::{Result, SerenityError};
use std::io::{self, Read};

/// Source of characters for the `,` opcode.
pub trait InputSource {
    fn read_char(&mut self) -> Result<char>;
}

/// Input source for evolved programs, which never read external input.
pub struct NoInput;

impl InputSource for NoInput {
    fn read_char(&mut self) -> Result<char> {
        Err(SerenityError::Input(
            "no input source attached".to_string(),
        ))
    }
}

/// Reads UTF-8 encoded characters one at a time from a byte stream.
pub struct ReaderInput<R: Read> {
    reader: R,
}

impl<R: Read> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl ReaderInput<io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<R: Read> InputSource for ReaderInput<R> {
    fn read_char(&mut self) -> Result<char> {
        let lead = self
            .read_byte()?
            .ok_or_else(|| SerenityError::Input("end of input stream".to_string()))?;

        let width = match lead {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => {
                return Err(SerenityError::Input(format!(
                    "invalid UTF-8 lead byte 0x{:02X}",
                    lead
                )))
            }
        };

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(|| {
                SerenityError::Input("input ended inside a UTF-8 sequence".to_string())
            })?;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| SerenityError::Input("invalid UTF-8 sequence".to_string()))
    }
}

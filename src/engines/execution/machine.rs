use crate::config::MachineConfig;
use crate::engines::execution::input::InputSource;
use crate::engines::execution::op::Op;
use crate::engines::execution::program::Program;
use crate::error::Result;

/// Cells allocated up front; the tape doubles from here on demand.
const INITIAL_TAPE_CELLS: usize = 1024;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The instruction pointer ran past the last symbol.
    EndOfProgram,
    /// The cycle budget was spent.
    CycleLimit,
    /// The output reached the requested length.
    OutputLimit,
    /// The data pointer moved past the last cell the machine may allocate.
    TapeExhausted,
}

/// Result of running one program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub output: String,
    /// Number of symbols emitted, `output.chars().count()`.
    pub emitted: usize,
    pub cycles: usize,
    pub halt: Halt,
}

pub struct VirtualMachine {
    tape: Vec<i64>,
    /// Highest cell index written since the last reset.
    touched: usize,
    tape_size: usize,
    cycle_limit: usize,
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new(&MachineConfig::default())
    }
}

impl VirtualMachine {
    pub fn new(config: &MachineConfig) -> Self {
        let tape_size = config.tape_size.max(1);
        Self {
            tape: vec![0; INITIAL_TAPE_CELLS.min(tape_size)],
            touched: 0,
            tape_size,
            cycle_limit: config.cycle_limit,
        }
    }

    /// Value of a tape cell after the last run.
    pub fn cell(&self, index: usize) -> i64 {
        self.tape.get(index).copied().unwrap_or(0)
    }

    /// Runs `program` on a zeroed tape and returns at most `output_limit`
    /// output symbols.
    ///
    /// Running out of cycles or tape is a normal halt that keeps the partial
    /// output. The only error is a failed read from `input`.
    pub fn execute(
        &mut self,
        program: &Program,
        output_limit: usize,
        input: &mut dyn InputSource,
    ) -> Result<Execution> {
        self.reset();

        let code = program.symbols();
        let mut pc = 0;
        let mut dc = 0;
        let mut cycles = 0;
        let mut output = String::new();
        let mut emitted = 0;

        let halt = loop {
            if pc >= code.len() {
                break Halt::EndOfProgram;
            }
            if cycles >= self.cycle_limit {
                break Halt::CycleLimit;
            }
            cycles += 1;

            match Op::decode(code[pc]) {
                Some(Op::Increment) => {
                    self.tape[dc] += 1;
                    self.touched = self.touched.max(dc);
                    pc += 1;
                }
                Some(Op::Decrement) => {
                    self.tape[dc] -= 1;
                    self.touched = self.touched.max(dc);
                    pc += 1;
                }
                Some(Op::MoveRight) => {
                    if !self.ensure_cell(dc + 1) {
                        break Halt::TapeExhausted;
                    }
                    dc += 1;
                    pc += 1;
                }
                Some(Op::MoveLeft) => {
                    dc = dc.saturating_sub(1);
                    pc += 1;
                }
                Some(Op::Output) => {
                    if emitted >= output_limit {
                        break Halt::OutputLimit;
                    }
                    output.push(to_symbol(self.tape[dc]));
                    emitted += 1;
                    pc += 1;
                    if emitted >= output_limit {
                        break Halt::OutputLimit;
                    }
                }
                Some(Op::Input) => {
                    let c = input.read_char()?;
                    self.tape[dc] = i64::from(u32::from(c));
                    self.touched = self.touched.max(dc);
                    pc += 1;
                }
                Some(Op::LoopStart) => {
                    if self.tape[dc] == 0 {
                        pc = match find_matching_forward(code, pc) {
                            Some(end) => end + 1,
                            None => code.len(),
                        };
                    } else {
                        pc += 1;
                    }
                }
                Some(Op::LoopEnd) => {
                    if self.tape[dc] != 0 {
                        // An unmatched `]` falls through like commentary.
                        pc = match find_matching_backward(code, pc) {
                            Some(start) => start + 1,
                            None => pc + 1,
                        };
                    } else {
                        pc += 1;
                    }
                }
                None => pc += 1,
            }
        };

        Ok(Execution {
            output,
            emitted,
            cycles,
            halt,
        })
    }

    fn reset(&mut self) {
        let end = (self.touched + 1).min(self.tape.len());
        self.tape[..end].iter_mut().for_each(|cell| *cell = 0);
        self.touched = 0;
    }

    /// Grows the tape by doubling until `index` is addressable. Returns false
    /// once `index` is past the configured tape size.
    fn ensure_cell(&mut self, index: usize) -> bool {
        if index < self.tape.len() {
            return true;
        }
        if index >= self.tape_size {
            return false;
        }
        let mut len = self.tape.len().max(1);
        while len <= index {
            len *= 2;
        }
        self.tape.resize(len.min(self.tape_size), 0);
        true
    }
}

/// Cell values that are not Unicode scalar values print as U+FFFD.
fn to_symbol(value: i64) -> char {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Index of the `]` closing the `[` at `position`.
pub fn find_matching_forward(code: &[char], position: usize) -> Option<usize> {
    let mut depth = 1usize;
    for (i, &symbol) in code.iter().enumerate().skip(position + 1) {
        match symbol {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the `[` opening the `]` at `position`.
pub fn find_matching_backward(code: &[char], position: usize) -> Option<usize> {
    let mut depth = 1usize;
    for i in (0..position).rev() {
        match code[i] {
            ']' => depth += 1,
            '[' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

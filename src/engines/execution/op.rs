#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // --- Tape ---
    Increment,
    Decrement,
    MoveRight,
    MoveLeft,

    // --- I/O ---
    Output,
    Input,

    // --- Control Flow ---
    LoopStart,
    LoopEnd,
}

impl Op {
    /// Opcodes the search is allowed to splice into programs. `Input` is left
    /// out: evolved programs never read external input.
    pub const GENES: [Op; 7] = [
        Op::Increment,
        Op::Decrement,
        Op::MoveRight,
        Op::MoveLeft,
        Op::Output,
        Op::LoopStart,
        Op::LoopEnd,
    ];

    /// Decodes a program symbol. Anything outside the alphabet is commentary.
    pub fn decode(symbol: char) -> Option<Op> {
        match symbol {
            '+' => Some(Op::Increment),
            '-' => Some(Op::Decrement),
            '>' => Some(Op::MoveRight),
            '<' => Some(Op::MoveLeft),
            '.' => Some(Op::Output),
            ',' => Some(Op::Input),
            '[' => Some(Op::LoopStart),
            ']' => Some(Op::LoopEnd),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Increment => '+',
            Op::Decrement => '-',
            Op::MoveRight => '>',
            Op::MoveLeft => '<',
            Op::Output => '.',
            Op::Input => ',',
            Op::LoopStart => '[',
            Op::LoopEnd => ']',
        }
    }
}

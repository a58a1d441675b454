pub mod input;
pub mod machine;
pub mod op;
pub mod program;

pub use input::{InputSource, NoInput, ReaderInput};
pub use machine::{Execution, Halt, VirtualMachine};
pub use op::Op;
pub use program::Program;

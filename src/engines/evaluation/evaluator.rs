use crate::config::MachineConfig;
use crate::engines::evaluation::fitness::edit_distance;
use crate::engines::execution::{Halt, NoInput, Program, VirtualMachine};
use crate::error::Result;
use crate::types::Fitness;

/// Output and score of one candidate program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub output: String,
    pub fitness: Fitness,
    pub cycles: usize,
    pub halt: Halt,
}

/// Runs candidate programs against a fixed target.
#[derive(Debug, Clone)]
pub struct Evaluator {
    target: Vec<char>,
    machine: MachineConfig,
}

impl Evaluator {
    pub fn new(target: &str, machine: MachineConfig) -> Self {
        Self {
            target: target.chars().collect(),
            machine,
        }
    }

    pub fn target_len(&self) -> usize {
        self.target.len()
    }

    pub fn new_machine(&self) -> VirtualMachine {
        VirtualMachine::new(&self.machine)
    }

    pub fn evaluate(&self, program: &Program) -> Result<Evaluation> {
        let mut vm = self.new_machine();
        self.evaluate_with(&mut vm, program)
    }

    /// Same as `evaluate` but reuses a machine, so the tape is not
    /// reallocated for every candidate.
    pub fn evaluate_with(&self, vm: &mut VirtualMachine, program: &Program) -> Result<Evaluation> {
        let execution = vm.execute(program, self.target.len(), &mut NoInput)?;
        let output: Vec<char> = execution.output.chars().collect();
        Ok(Evaluation {
            fitness: edit_distance(&output, &self.target),
            output: execution.output,
            cycles: execution.cycles,
            halt: execution.halt,
        })
    }
}

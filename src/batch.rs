use rayon::prelude::*;

use crate::machine::{Machine, MachineConfig, RunResult};
use crate::program::Program;

/// Result of one program in a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub result: RunResult,
    /// Everything the program wrote, including output produced before a failure.
    pub output: Vec<u8>,
}

/// Run every program in parallel, each on its own fresh machine.
///
/// Each run gets its own tape, bracket stack and output buffer, and reads
/// `input` from the start. Outcomes are returned in the order of `programs`.
pub fn run_batch(programs: &[Program], input: &[u8], config: MachineConfig) -> Vec<BatchOutcome> {
    programs
        .par_iter()
        .map(|program| run_one(program, input, config))
        .collect()
}

fn run_one(program: &Program, input: &[u8], config: MachineConfig) -> BatchOutcome {
    let mut output = Vec::new();
    let result = match Machine::new(program, config) {
        Ok(mut machine) => {
            let mut input = input;
            machine.run(&mut input, &mut output)
        }
        Err(e) => Err(e),
    };
    BatchOutcome { result, output }
}

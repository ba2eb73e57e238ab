pub mod error;
pub mod stack;
pub mod tape;
pub mod program;
pub mod io;
pub mod machine;
pub mod batch;

pub use error::{Bracket, Error};
pub use machine::{EofPolicy, Halted, Machine, MachineConfig, RunResult, Status, run};
pub use program::{Program, load_program};
pub use tape::Tape;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_api_drives_a_run() {
        let program = load_program("+,.");
        let config = MachineConfig {
            tape_size: 4,
            step_limit: None,
            eof: EofPolicy::Unchanged,
        };
        let mut machine = Machine::new(&program, config).unwrap();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();
        let mut status = Status::Running;
        while status == Status::Running {
            status = machine.step(&mut input, &mut output).unwrap();
        }
        assert_eq!(status, Status::Halted);
        assert_eq!(output, vec![1]);
    }
}

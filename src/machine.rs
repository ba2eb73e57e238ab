use tracing::{debug, trace};

use crate::error::Error;
use crate::io::{ByteSink, ByteSource};
use crate::program::{Instruction, Program};
use crate::stack::BracketStack;
use crate::tape::{DEFAULT_TAPE_SIZE, Tape};

/// What `,` stores once the input source is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Store 0 in the current cell.
    #[default]
    Zero,
    /// Leave the current cell as it is.
    Unchanged,
}

/// Configuration for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Number of tape cells.
    pub tape_size: usize,
    /// Maximum steps before the run is abandoned (`None` for unbounded).
    pub step_limit: Option<usize>,
    /// Behaviour of `,` after the input runs out.
    pub eof: EofPolicy,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            step_limit: None,
            eof: EofPolicy::Zero,
        }
    }
}

/// Successful end of a run: the program counter reached the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halted {
    pub steps: usize,
}

pub type RunResult = Result<Halted, Error>;

/// Outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

/// The execution engine.
///
/// Owns the tape, program counter and bracket stack for one run of one
/// program. Nothing is shared between machines, so independent runs can be
/// driven from different threads. A machine that returned an error is not
/// meant to be resumed.
#[derive(Debug)]
pub struct Machine<'p> {
    program: &'p Program,
    tape: Tape,
    pc: usize,
    stack: BracketStack,
    steps: usize,
    step_limit: Option<usize>,
    eof: EofPolicy,
}

impl<'p> Machine<'p> {
    pub fn new(program: &'p Program, config: MachineConfig) -> Result<Self, Error> {
        let tape = Tape::new(config.tape_size)?;
        let mut machine = Self::with_tape(program, tape);
        machine.step_limit = config.step_limit;
        machine.eof = config.eof;
        Ok(machine)
    }

    /// Machine over an existing tape, with default EOF handling and no step limit.
    pub fn with_tape(program: &'p Program, tape: Tape) -> Self {
        Self {
            program,
            tape,
            pc: 0,
            stack: BracketStack::new(),
            steps: 0,
            step_limit: None,
            eof: EofPolicy::default(),
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn into_tape(self) -> Tape {
        self.tape
    }

    pub fn is_halted(&self) -> bool {
        self.pc >= self.program.len()
    }

    /// Execute the instruction at the program counter.
    ///
    /// Returns `Status::Halted` once the program counter has reached the end
    /// of the program; stepping a halted machine does nothing.
    pub fn step<I, O>(&mut self, input: &mut I, output: &mut O) -> Result<Status, Error>
    where
        I: ByteSource + ?Sized,
        O: ByteSink + ?Sized,
    {
        let Some(instruction) = self.program.get(self.pc) else {
            return Ok(Status::Halted);
        };

        self.pc = match instruction {
            Instruction::Left => {
                self.tape.move_left();
                self.pc + 1
            }
            Instruction::Right => {
                self.tape.move_right();
                self.pc + 1
            }
            Instruction::Increment => {
                self.tape.increment();
                self.pc + 1
            }
            Instruction::Decrement => {
                self.tape.decrement();
                self.pc + 1
            }
            Instruction::Output => {
                output.write_byte(self.tape.current())?;
                self.pc + 1
            }
            Instruction::Input => {
                // Prompts written without a newline must be visible before we block.
                output.flush()?;
                match input.read_byte()? {
                    Some(byte) => {
                        self.tape.store(byte);
                    }
                    None => {
                        if self.eof == EofPolicy::Zero {
                            self.tape.store(0);
                        }
                    }
                }
                self.pc + 1
            }
            Instruction::LoopStart => {
                enter_loop(self.program, self.pc, self.tape.current(), &mut self.stack)?
            }
            Instruction::LoopEnd => continue_loop(self.pc, self.tape.current(), &mut self.stack)?,
            Instruction::Other(_) => self.pc + 1,
        };
        self.steps += 1;

        if self.is_halted() {
            Ok(Status::Halted)
        } else {
            Ok(Status::Running)
        }
    }

    /// Step until the program halts, fails, or exhausts the step limit.
    pub fn run<I, O>(&mut self, input: &mut I, output: &mut O) -> RunResult
    where
        I: ByteSource + ?Sized,
        O: ByteSink + ?Sized,
    {
        debug!(
            program_len = self.program.len(),
            tape_size = self.tape.len(),
            "run start"
        );
        let result = self.run_to_end(input, output);
        match &result {
            Ok(halted) => debug!(steps = halted.steps, "halted"),
            Err(err) => debug!(pc = self.pc, steps = self.steps, %err, "run failed"),
        }
        result
    }

    fn run_to_end<I, O>(&mut self, input: &mut I, output: &mut O) -> RunResult
    where
        I: ByteSource + ?Sized,
        O: ByteSink + ?Sized,
    {
        loop {
            if let Some(limit) = self.step_limit {
                if self.steps >= limit && !self.is_halted() {
                    return Err(Error::StepLimitExceeded { steps: self.steps });
                }
            }
            if self.step(input, output)? == Status::Halted {
                output.flush()?;
                return Ok(Halted { steps: self.steps });
            }
        }
    }
}

/// Run `program` to completion on `tape` with default EOF handling.
pub fn run<I, O>(program: &Program, tape: Tape, input: &mut I, output: &mut O) -> RunResult
where
    I: ByteSource + ?Sized,
    O: ByteSink + ?Sized,
{
    Machine::with_tape(program, tape).run(input, output)
}

/// Resolve a `[` at `pc` and return the next program counter.
///
/// A nonzero cell enters the loop and records `pc` on the stack. A zero cell
/// scans forward for the matching `]`, counting nested pairs, and jumps past
/// it. The scan is repeated every time the loop is skipped; an unmatched `[`
/// is only detected here, and the stack is left untouched when it is.
pub fn enter_loop(
    program: &Program,
    pc: usize,
    cell: u8,
    stack: &mut BracketStack,
) -> Result<usize, Error> {
    if cell != 0 {
        stack.push(pc);
        trace!(pc, depth = stack.size(), "enter loop");
        return Ok(pc + 1);
    }

    let mut nesting: usize = 0;
    for (pos, &instruction) in program.instructions().iter().enumerate().skip(pc + 1) {
        match instruction {
            Instruction::LoopStart => nesting += 1,
            Instruction::LoopEnd if nesting == 0 => {
                trace!(pc, target = pos + 1, "skip loop");
                return Ok(pos + 1);
            }
            Instruction::LoopEnd => nesting -= 1,
            _ => {}
        }
    }
    Err(Error::unmatched_open(pc))
}

/// Resolve a `]` at `pc` and return the next program counter.
///
/// A zero cell closes the innermost loop; a nonzero cell jumps to just after
/// its `[`. Fails when no loop is open.
pub fn continue_loop(pc: usize, cell: u8, stack: &mut BracketStack) -> Result<usize, Error> {
    if stack.is_empty() {
        return Err(Error::unmatched_close(pc));
    }
    if cell == 0 {
        stack.pop()?;
        trace!(pc, depth = stack.size(), "exit loop");
        Ok(pc + 1)
    } else {
        let start = stack.peek()?;
        trace!(pc, target = start + 1, "repeat loop");
        Ok(start + 1)
    }
}

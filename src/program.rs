use std::fmt;
use std::path::Path;

use crate::error::Error;

/// One position of a program. Every source character maps to exactly one
/// instruction, so indices line up with the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Left,
    Right,
    Increment,
    Decrement,
    Output,
    Input,
    LoopStart,
    LoopEnd,
    /// Any other character. Executes as a no-op.
    Other(char),
}

impl From<char> for Instruction {
    fn from(c: char) -> Self {
        match c {
            '<' => Instruction::Left,
            '>' => Instruction::Right,
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => Instruction::LoopStart,
            ']' => Instruction::LoopEnd,
            other => Instruction::Other(other),
        }
    }
}

impl From<Instruction> for char {
    fn from(instruction: Instruction) -> Self {
        match instruction {
            Instruction::Left => '<',
            Instruction::Right => '>',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
            Instruction::Other(c) => c,
        }
    }
}

impl Instruction {
    /// Returns true for the eight operators (as opposed to a no-op).
    pub fn is_operator(self) -> bool {
        !matches!(self, Instruction::Other(_))
    }
}

/// An immutable instruction sequence, loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

/// Parse source text into a program. Brackets are not checked here; an
/// unmatched bracket only surfaces if execution reaches it.
pub fn load_program(source: &str) -> Program {
    Program {
        instructions: source.chars().map(Instruction::from).collect(),
    }
}

impl Program {
    /// Read and parse a program file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let source = std::fs::read_to_string(path)?;
        Ok(load_program(&source))
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, pc: usize) -> Option<Instruction> {
        self.instructions.get(pc).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of positions holding one of the eight operators.
    pub fn instruction_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_operator()).count()
    }

    /// Whole-program bracket validation.
    ///
    /// Execution never calls this; it exists for callers that want malformed
    /// programs rejected before anything runs. Reports the first `]` without
    /// an open loop, or else the innermost `[` left open at the end.
    pub fn check_brackets(&self) -> Result<(), Error> {
        let mut open = Vec::new();
        for (pos, instruction) in self.instructions.iter().enumerate() {
            match instruction {
                Instruction::LoopStart => open.push(pos),
                Instruction::LoopEnd => {
                    if open.pop().is_none() {
                        return Err(Error::unmatched_close(pos));
                    }
                }
                _ => {}
            }
        }
        match open.pop() {
            Some(pos) => Err(Error::unmatched_open(pos)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &instruction in &self.instructions {
            write!(f, "{}", char::from(instruction))?;
        }
        Ok(())
    }
}

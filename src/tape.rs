use crate::error::Error;

/// Canonical number of cells.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// Largest value a cell can hold. Cells saturate at both ends of `[0, CELL_MAX]`.
pub const CELL_MAX: u8 = 127;

/// Fixed-size memory tape with a movable pointer.
///
/// The pointer is clamped to `[0, len - 1]` and cells are saturated to
/// `[0, CELL_MAX]`, so no operation on a tape can go out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    /// Create a zeroed tape of `size` cells with the pointer at 0.
    pub fn new(size: usize) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidTapeSize);
        }
        Ok(Self {
            cells: vec![0; size],
            pointer: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Value under the pointer.
    #[inline(always)]
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    #[inline(always)]
    pub fn move_left(&mut self) -> usize {
        if self.pointer > 0 {
            self.pointer -= 1;
        }
        self.pointer
    }

    #[inline(always)]
    pub fn move_right(&mut self) -> usize {
        if self.pointer < self.cells.len() - 1 {
            self.pointer += 1;
        }
        self.pointer
    }

    #[inline(always)]
    pub fn increment(&mut self) -> u8 {
        let cell = &mut self.cells[self.pointer];
        if *cell < CELL_MAX {
            *cell += 1;
        }
        *cell
    }

    #[inline(always)]
    pub fn decrement(&mut self) -> u8 {
        let cell = &mut self.cells[self.pointer];
        if *cell > 0 {
            *cell -= 1;
        }
        *cell
    }

    /// Store `value` under the pointer, saturating anything above `CELL_MAX`.
    #[inline(always)]
    pub fn store(&mut self, value: u8) -> u8 {
        let value = value.min(CELL_MAX);
        self.cells[self.pointer] = value;
        value
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Left,
        Right,
        Inc,
        Dec,
        Store(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Left),
            Just(Op::Right),
            Just(Op::Inc),
            Just(Op::Dec),
            any::<u8>().prop_map(Op::Store),
        ]
    }

    proptest! {
        #[test]
        fn pointer_and_cells_stay_in_range(
            size in 1usize..64,
            ops in prop::collection::vec(op(), 0..512)
        ) {
            let mut tape = Tape::new(size).unwrap();
            for op in ops {
                match op {
                    Op::Left => { tape.move_left(); }
                    Op::Right => { tape.move_right(); }
                    Op::Inc => { tape.increment(); }
                    Op::Dec => { tape.decrement(); }
                    Op::Store(b) => { tape.store(b); }
                }
                prop_assert!(tape.pointer() < tape.len());
                prop_assert!(tape.current() <= CELL_MAX);
            }
            prop_assert_eq!(tape.len(), size);
        }
    }
}

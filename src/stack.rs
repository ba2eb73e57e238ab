/// Returned by [`BracketStack::pop`] and [`BracketStack::peek`] when there is
/// nothing on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bracket stack is empty")]
pub struct EmptyStack;

/// LIFO store of program positions, one entry per currently open loop.
///
/// Backed by a `Vec`, so nesting depth is bounded only by memory. The top of
/// the stack is the innermost open `[`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketStack {
    positions: Vec<usize>,
}

impl BracketStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn push(&mut self, position: usize) {
        self.positions.push(position);
    }

    #[inline(always)]
    pub fn pop(&mut self) -> Result<usize, EmptyStack> {
        self.positions.pop().ok_or(EmptyStack)
    }

    #[inline(always)]
    pub fn peek(&self) -> Result<usize, EmptyStack> {
        self.positions.last().copied().ok_or(EmptyStack)
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions from bottom (outermost loop) to top (innermost loop).
    pub fn as_slice(&self) -> &[usize] {
        &self.positions
    }
}

impl From<Vec<usize>> for BracketStack {
    fn from(positions: Vec<usize>) -> Self {
        Self { positions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stack_is_empty() {
        let stack = BracketStack::new();
        assert_eq!(stack.size(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_push_grows_size() {
        let mut stack = BracketStack::new();
        stack.push(4);
        stack.push(9);
        assert_eq!(stack.size(), 2);
        assert_eq!(stack.as_slice(), &[4, 9]);
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut stack = BracketStack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut stack = BracketStack::new();
        stack.push(17);
        assert_eq!(stack.peek(), Ok(17));
        assert_eq!(stack.peek(), Ok(17));
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn test_pop_empty_fails() {
        let mut stack = BracketStack::new();
        assert_eq!(stack.pop(), Err(EmptyStack));
        // A failed pop leaves the stack usable.
        stack.push(0);
        assert_eq!(stack.pop(), Ok(0));
        assert_eq!(stack.pop(), Err(EmptyStack));
    }

    #[test]
    fn test_peek_empty_fails() {
        let stack = BracketStack::new();
        assert_eq!(stack.peek(), Err(EmptyStack));
    }

    #[test]
    fn test_deep_nesting() {
        let mut stack = BracketStack::new();
        for i in 0..100_000 {
            stack.push(i);
        }
        assert_eq!(stack.size(), 100_000);
        assert_eq!(stack.peek(), Ok(99_999));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pops_reverse_pushes(values in prop::collection::vec(any::<usize>(), 0..64)) {
            let mut stack = BracketStack::new();
            for &v in &values {
                stack.push(v);
            }
            prop_assert_eq!(stack.size(), values.len());
            for &v in values.iter().rev() {
                prop_assert_eq!(stack.peek(), Ok(v));
                prop_assert_eq!(stack.pop(), Ok(v));
            }
            prop_assert_eq!(stack.pop(), Err(EmptyStack));
        }
    }
}

// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The call stack, holding return addresses for `call`/`ret`

use super::Adr;

/// Default depth of the call stack, matching the 16 frames of most interpreters
pub const DEFAULT_STACK_LIMIT: usize = 16;

/// A growable stack of return addresses, with an optional depth limit
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stack {
    frames: Vec<Adr>,
    limit: Option<usize>,
}

impl Stack {
    /// Constructs an empty stack which holds at most `limit` frames.
    /// `None` leaves the stack unbounded.
    pub fn new(limit: Option<usize>) -> Self {
        Stack {
            frames: vec![],
            limit,
        }
    }

    /// Pushes a return address. Returns the address back if the stack is full.
    pub fn push(&mut self, addr: Adr) -> std::result::Result<(), Adr> {
        match self.limit {
            Some(limit) if self.frames.len() >= limit => Err(addr),
            _ => {
                self.frames.push(addr);
                Ok(())
            }
        }
    }

    /// Pops the most recent return address, if there is one
    pub fn pop(&mut self) -> Option<Adr> {
        self.frames.pop()
    }

    /// Gets the configured depth limit
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of frames currently on the stack
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if there is nothing to return to
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drops every frame
    pub fn clear(&mut self) {
        self.frames.clear()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new(Some(DEFAULT_STACK_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_from_empty() {
        let mut stack = Stack::default();
        assert_eq!(None, stack.pop());
    }

    #[test]
    fn simple_push_pop() {
        let mut stack = Stack::default();
        stack.push(0x128).unwrap();
        stack.push(0x2aa).unwrap();
        assert_eq!(2, stack.len());
        assert_eq!(Some(0x2aa), stack.pop());
        assert_eq!(Some(0x128), stack.pop());
        assert!(stack.is_empty());
    }

    #[test]
    fn limit_reached() {
        let mut stack = Stack::new(Some(2));
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert_eq!(Err(3), stack.push(3));
        assert_eq!(2, stack.len());
    }

    #[test]
    fn unbounded() {
        let mut stack = Stack::new(None);
        for addr in 0..1000 {
            stack.push(addr).unwrap();
        }
        assert_eq!(1000, stack.len());
        stack.clear();
        assert!(stack.is_empty());
    }
}

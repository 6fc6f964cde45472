// The machine's operand stack. It's unbounded: compiled programs are balanced, so it never grows past
// the depth of the deepest expression, and only hand-written instruction text can pop it empty.

use std::fmt::Display;

use crate::error::{Error, InternalError};

/// LIFO stack of integers the instructions operate on.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstructionStack(Vec<i32>);

impl InstructionStack {
    /// A new stack is empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a value on top.
    pub fn push(&mut self, value: i32) {
        self.0.push(value);
    }

    /// Remove and return the top value.
    pub fn pop(&mut self) -> Result<i32, Error> {
        self.0.pop().ok_or_else(|| InternalError::EmptyStack.into())
    }

    /// The top value, left in place.
    pub fn top(&self) -> Result<i32, Error> {
        self.0
            .last()
            .copied()
            .ok_or_else(|| InternalError::EmptyStack.into())
    }

    /// Number of values on the stack.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there's nothing on the stack.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values from the top of the stack down.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().rev().copied()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

/// `depth: value` lines, top of the stack first, or `EMPTY`.
impl Display for InstructionStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "EMPTY");
        }
        for (depth, value) in self.iter().enumerate() {
            writeln!(f, "{}: {}", depth, value)?;
        }
        Ok(())
    }
}

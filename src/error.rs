use thiserror::Error;

/// Errors that can be returned while building, interpreting, assembling or executing a program.
/// None of them are recoverable: the phase that hit one stops right there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Division or remainder with a zero right-hand side
    #[error("divide by zero")]
    DivideByZero,
    /// Square root of a negative number
    #[error("square root of negative number")]
    NegativeSquareRoot,
    /// Ran out of tokens in the middle of a statement
    #[error("premature end of statement")]
    PrematureEnd,
    /// A statement started with something other than `=` or `@`
    #[error("illegal action encountered in source: {0}")]
    IllegalAction(String),
    /// An instruction line the machine doesn't understand
    #[error("illegal instruction: {0}")]
    IllegalInstruction(String),
    /// A token in expression position that is neither an operator, an identifier nor an integer
    #[error("illegal operator in expression: {0}")]
    IllegalOperator(String),
    /// Read of a variable that was never assigned
    #[error("uninitialized variable: {0}")]
    Uninitialized(String),
    /// Internal Errors should not occur for code that was compiled, but hand-written instructions can cause them.
    #[error("machine internal error: {0}")]
    Internal(#[from] InternalError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Machine faults that well-formed compiled code never produces
pub enum InternalError {
    /// Tried to pop or peek an empty stack
    #[error("popped from an empty stack")]
    EmptyStack,
}

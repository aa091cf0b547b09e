//! Core error types.
//!
//! Only structurally impossible requests surface as errors. A spoken answer
//! that cannot be understood is `None`, and a wrong answer is a normal
//! `false` from verification.

use thiserror::Error;

/// Errors raised while producing a new problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The requested difficulty is outside the supported tiers.
    #[error("invalid difficulty {0}: expected a level between 1 and 9")]
    InvalidDifficulty(u32),

    /// No operand satisfying the divide constraints exists in the range.
    #[error("no composite operand in range [{low}, {high}]")]
    UnsatisfiableRange { low: i64, high: i64 },

    /// The drawn operands do not form a valid expression.
    #[error(transparent)]
    InvalidExpression(#[from] ExpressionParseError),
}

/// Errors raised by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// An answer was submitted while no problem was waiting for one.
    #[error("no open problem to answer")]
    NoOpenProblem,
}

/// Errors raised when parsing an expression from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionParseError {
    /// The text did not have the `<a> <op> <b>` shape.
    #[error("expected `<operand> <operator> <operand>`, got {0:?}")]
    Malformed(String),

    /// An operand was not a valid integer.
    #[error("invalid operand {0:?}")]
    InvalidOperand(String),

    /// The operator symbol is not one of `+ - * / × ÷`.
    #[error("unknown operator {0:?}")]
    UnknownOperator(String),

    /// The divisor is zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The division does not produce an integer quotient.
    #[error("{a} is not divisible by {b}")]
    InexactDivision { a: i64, b: i64 },

    /// The value does not fit in an `i64`.
    #[error("value of {0:?} overflows")]
    Overflow(String),
}

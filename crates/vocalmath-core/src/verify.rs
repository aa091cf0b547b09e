//! Answer verification.

use crate::model::Expression;

/// Check a candidate answer against the expression's true value.
///
/// The value comes from a typed evaluation of the operand/operator triple,
/// never from evaluating the display text.
pub fn verify(expression: &Expression, candidate: i64) -> bool {
    let correct = expression.value() == candidate;
    tracing::trace!(expression = %expression, candidate, correct, "verified answer");
    correct
}

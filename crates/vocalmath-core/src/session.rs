//! Drill session state machine.
//!
//! ```text
//! Idle -> ProblemShown -> AwaitingAnswer -> (Correct | Incorrect) -> ProblemShown | Idle
//! ```
//!
//! A [`Session`] is a value: every transition returns a new session and
//! leaves the original untouched, so a failed transition never leaves
//! half-updated state behind.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GenerateError, SessionError};
use crate::generator::ExpressionGenerator;
use crate::model::{DifficultyLevel, Expression};
use crate::verify::verify;

/// Identifier used to correlate one session's log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a session is in the drill loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    ProblemShown,
    AwaitingAnswer,
    Correct,
    Incorrect,
}

/// Outcome of submitting a resolved answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Nothing usable was heard; the problem stays open and the host should
    /// ask again.
    Unresolved,
}

/// The current problem and last resolved answer of one drill interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    phase: Phase,
    expression: Option<Expression>,
    answer: Option<i64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh idle session.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            phase: Phase::Idle,
            expression: None,
            answer: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The live problem, if one has been generated.
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    /// The last resolved answer for the live problem.
    pub fn answer(&self) -> Option<i64> {
        self.answer
    }

    /// Whether the live problem is still waiting for an answer.
    pub fn is_open(&self) -> bool {
        self.phase == Phase::ProblemShown && self.expression.is_some()
    }

    /// Show a new problem, discarding any previous problem and answer.
    ///
    /// # Errors
    ///
    /// Returns the generator's error; `self` is left as it was.
    pub fn generate<R: Rng>(
        &self,
        generator: &mut ExpressionGenerator<R>,
        difficulty: DifficultyLevel,
    ) -> Result<Session, GenerateError> {
        self.replace_problem(|| generator.generate(difficulty))
    }

    /// Show the problem produced by `produce`, or keep `self` as it was if
    /// producing it fails.
    pub fn replace_problem<F>(&self, produce: F) -> Result<Session, GenerateError>
    where
        F: FnOnce() -> Result<Expression, GenerateError>,
    {
        let expression = produce()?;
        Ok(self.with_problem(expression))
    }

    /// Show a specific problem, discarding any previous problem and answer.
    pub fn with_problem(&self, expression: Expression) -> Session {
        tracing::debug!(session = %self.id, %expression, "problem shown");
        Session {
            id: self.id,
            phase: Phase::ProblemShown,
            expression: Some(expression),
            answer: None,
        }
    }

    /// Submit a resolved spoken answer for the live problem.
    ///
    /// `None` keeps the problem open with [`Verdict::Unresolved`]. A number
    /// is recorded and judged, moving the session to `Correct` or
    /// `Incorrect`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoOpenProblem` if no problem is waiting for an
    /// answer.
    pub fn submit(&self, resolved: Option<i64>) -> Result<(Session, Verdict), SessionError> {
        let expression = match (self.phase, self.expression) {
            (Phase::ProblemShown, Some(expression)) => expression,
            _ => return Err(SessionError::NoOpenProblem),
        };

        let Some(answer) = resolved else {
            tracing::debug!(session = %self.id, "answer unresolved, asking again");
            return Ok((self.clone(), Verdict::Unresolved));
        };

        let awaiting = Session {
            answer: Some(answer),
            phase: Phase::AwaitingAnswer,
            ..self.clone()
        };
        Ok(awaiting.judge(&expression, answer))
    }

    /// Return to idle, dropping the problem and answer.
    pub fn reset(&self) -> Session {
        Session {
            id: self.id,
            ..Session::new()
        }
    }

    fn judge(self, expression: &Expression, answer: i64) -> (Session, Verdict) {
        let (phase, verdict) = if verify(expression, answer) {
            (Phase::Correct, Verdict::Correct)
        } else {
            (Phase::Incorrect, Verdict::Incorrect)
        };
        tracing::debug!(session = %self.id, %expression, answer, ?verdict, "answer judged");
        (Session { phase, ..self }, verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operator;

    fn seven_plus_three() -> Session {
        Session::new().with_problem(Expression::new(7, Operator::Add, 3).unwrap())
    }

    #[test]
    fn new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.expression().is_none());
        assert!(!session.is_open());
    }

    #[test]
    fn generate_shows_problem_and_clears_answer() {
        let mut generator = ExpressionGenerator::from_seed(3);
        let (answered, _) = seven_plus_three().submit(Some(10)).unwrap();
        assert_eq!(answered.answer(), Some(10));

        let next = answered
            .generate(&mut generator, DifficultyLevel::EASY)
            .unwrap();
        assert_eq!(next.phase(), Phase::ProblemShown);
        assert_eq!(next.answer(), None);
        assert_eq!(next.id(), answered.id());
        assert!(next.is_open());
    }

    #[test]
    fn correct_and_incorrect_answers() {
        let session = seven_plus_three();

        let (correct, verdict) = session.submit(Some(10)).unwrap();
        assert_eq!(verdict, Verdict::Correct);
        assert_eq!(correct.phase(), Phase::Correct);

        let (wrong, verdict) = session.submit(Some(-10)).unwrap();
        assert_eq!(verdict, Verdict::Incorrect);
        assert_eq!(wrong.phase(), Phase::Incorrect);
        assert_eq!(wrong.answer(), Some(-10));

        // Transitions never touch the original value.
        assert_eq!(session.phase(), Phase::ProblemShown);
        assert_eq!(session.answer(), None);
    }

    #[test]
    fn unresolved_answer_keeps_problem_open() {
        let session = seven_plus_three();
        let (next, verdict) = session.submit(None).unwrap();
        assert_eq!(verdict, Verdict::Unresolved);
        assert_eq!(next.phase(), Phase::ProblemShown);
        assert!(next.is_open());
        assert_eq!(next.expression(), session.expression());
    }

    #[test]
    fn submitting_without_open_problem_fails() {
        assert_eq!(
            Session::new().submit(Some(1)),
            Err(SessionError::NoOpenProblem)
        );

        let (judged, _) = seven_plus_three().submit(Some(10)).unwrap();
        assert_eq!(judged.submit(Some(10)), Err(SessionError::NoOpenProblem));
    }

    #[test]
    fn failed_generation_leaves_session_untouched() {
        let session = seven_plus_three();
        let result = session.replace_problem(|| {
            Err(GenerateError::UnsatisfiableRange { low: 2, high: 3 })
        });

        assert_eq!(
            result.unwrap_err(),
            GenerateError::UnsatisfiableRange { low: 2, high: 3 }
        );
        assert_eq!(session.phase(), Phase::ProblemShown);
        assert_eq!(session.expression().map(Expression::value), Some(10));
    }

    #[test]
    fn reset_returns_to_idle() {
        let session = seven_plus_three().reset();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.expression().is_none());
    }
}

//! vocalmath-core — Problem generation and spoken-answer verification.
//!
//! This crate generates arithmetic problems for a difficulty tier, resolves
//! recognized speech into signed integers, and verifies answers. Speech
//! recognition and playback are reached only through the traits in
//! [`traits`].

pub mod drill;
pub mod error;
pub mod generator;
pub mod model;
pub mod report;
pub mod resolver;
pub mod session;
pub mod traits;
pub mod verify;

pub use error::{ExpressionParseError, GenerateError, SessionError};
pub use generator::ExpressionGenerator;
pub use model::{DifficultyLevel, Expression, Operator};
pub use resolver::AnswerResolver;
pub use session::{Phase, Session, Verdict};
pub use verify::verify;

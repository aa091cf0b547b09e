//! Collaborator traits for speech recognition and speech playback.
//!
//! These async traits are implemented by the `vocalmath-speech` crate. The
//! core never waits on audio itself; it only sees the finished transcript.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{DifficultyLevel, Expression};

// ---------------------------------------------------------------------------
// Speech-to-text
// ---------------------------------------------------------------------------

/// Trait for recognizers that turn a bounded recording into text.
///
/// Implementations own their model or device handle for their whole
/// lifetime; [`SpeechToText::shutdown`] releases it.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Human-readable recognizer name (e.g. "stdin").
    fn name(&self) -> &str;

    /// Listen for one answer and return a best-effort transcript.
    async fn transcribe(&self, request: &TranscribeRequest) -> anyhow::Result<Transcript>;

    /// Release the recognizer's resources.
    async fn shutdown(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Request to listen for a spoken answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeRequest {
    /// How long to listen before giving up.
    pub window: Duration,
    /// Difficulty of the problem being answered.
    pub difficulty: DifficultyLevel,
    /// Display form of the problem, for recognizers that show it.
    pub problem: String,
    /// 1-based attempt number for this problem.
    pub attempt: u32,
}

/// Best-effort text heard during a recording window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Recognized text; empty when nothing was heard.
    pub text: String,
    /// Whether the recognizer only produced a partial result.
    #[serde(default)]
    pub partial: bool,
    /// Time spent listening and recognizing, in milliseconds.
    #[serde(default)]
    pub latency_ms: u64,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Nothing was heard.
    pub fn empty() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Text-to-speech
// ---------------------------------------------------------------------------

/// Trait for playing prompts aloud.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Human-readable synthesizer name (e.g. "console").
    fn name(&self) -> &str;

    /// Speak the text.
    async fn speak(&self, text: &str) -> anyhow::Result<()>;

    /// Release the synthesizer's resources.
    async fn shutdown(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Spoken when an answer could not be understood.
pub const REPEAT_PROMPT: &str = "Your voice wasn't clear, can you please try again?";

/// Plain-text prompt asking for the value of an expression.
///
/// The operator is read as a word and negative operands as `minus`, so
/// every synthesizer reads the problem the same way.
pub fn spoken_prompt(expression: &Expression) -> String {
    let sentence = format!(
        "What does {} {} {} equal to?",
        expression.operand_a(),
        expression.operator().spoken(),
        expression.operand_b()
    );
    speakable(&sentence)
}

/// Replace `-` with the word `minus` and tidy the spacing.
pub fn speakable(text: &str) -> String {
    text.replace('-', " minus ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

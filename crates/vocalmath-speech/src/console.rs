//! Synthesizers that do not produce audio.

use anyhow::Result;
use async_trait::async_trait;

use vocalmath_core::traits::SpeechSynthesizer;

/// Prints prompts to stderr instead of reading them aloud.
pub struct ConsoleSynthesizer;

#[async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    fn name(&self) -> &str {
        "console"
    }

    async fn speak(&self, text: &str) -> Result<()> {
        eprintln!("[tts] {text}");
        Ok(())
    }
}

/// Discards prompts.
pub struct SilentSynthesizer;

#[async_trait]
impl SpeechSynthesizer for SilentSynthesizer {
    fn name(&self) -> &str {
        "silent"
    }

    async fn speak(&self, text: &str) -> Result<()> {
        tracing::trace!(text, "prompt discarded");
        Ok(())
    }
}

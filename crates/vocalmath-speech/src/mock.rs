//! Mock collaborators for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use vocalmath_core::traits::{SpeechSynthesizer, SpeechToText, TranscribeRequest, Transcript};

/// A mock recognizer for driving drills without a microphone.
///
/// Returns scripted transcripts in order, then empty transcripts once the
/// script runs out.
pub struct MockTranscriber {
    /// Transcripts still to be returned.
    script: Mutex<VecDeque<String>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<TranscribeRequest>>,
    /// Whether `shutdown` has been called.
    shut_down: AtomicBool,
}

impl MockTranscriber {
    /// Create a mock that hears the given transcripts in order.
    pub fn new<I, S>(transcripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Mutex::new(transcripts.into_iter().map(Into::into).collect()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Create a mock that never hears anything.
    pub fn silent() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Get the number of calls made to this recognizer.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this recognizer.
    pub fn last_request(&self) -> Option<TranscribeRequest> {
        self.last_request.lock().unwrap().clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpeechToText for MockTranscriber {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcribe(&self, request: &TranscribeRequest) -> anyhow::Result<Transcript> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let text = self.script.lock().unwrap().pop_front().unwrap_or_default();
        Ok(Transcript {
            text,
            partial: false,
            latency_ms: 1,
        })
    }

    async fn shutdown(&self) -> anyhow::Result<()> {
        self.shut_down.store(true, Ordering::Relaxed);
        Ok(())
    }
}

/// A mock synthesizer that records everything it is asked to say.
pub struct MockSynthesizer {
    spoken: Mutex<Vec<String>>,
    fail: bool,
    shut_down: AtomicBool,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            spoken: Mutex::new(Vec::new()),
            fail: false,
            shut_down: AtomicBool::new(false),
        }
    }

    /// Create a mock whose playback always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn speak(&self, text: &str) -> anyhow::Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        if self.fail {
            anyhow::bail!("mock playback failure");
        }
        Ok(())
    }

    async fn shutdown(&self) -> anyhow::Result<()> {
        self.shut_down.store(true, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vocalmath_core::DifficultyLevel;

    use super::*;

    fn request(attempt: u32) -> TranscribeRequest {
        TranscribeRequest {
            window: Duration::from_secs(5),
            difficulty: DifficultyLevel::EASY,
            problem: "7 + 3".into(),
            attempt,
        }
    }

    #[tokio::test]
    async fn scripted_transcripts_then_silence() {
        let mock = MockTranscriber::new(["ten", "minus ten"]);

        assert_eq!(mock.transcribe(&request(1)).await.unwrap().text, "ten");
        assert_eq!(mock.transcribe(&request(2)).await.unwrap().text, "minus ten");
        assert_eq!(mock.transcribe(&request(3)).await.unwrap().text, "");
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.last_request().unwrap().attempt, 3);
    }

    #[tokio::test]
    async fn shutdown_is_recorded() {
        let mock = MockTranscriber::silent();
        assert!(!mock.is_shut_down());
        mock.shutdown().await.unwrap();
        assert!(mock.is_shut_down());
    }

    #[tokio::test]
    async fn synthesizer_records_and_fails_on_demand() {
        let ok = MockSynthesizer::new();
        ok.speak("hello").await.unwrap();
        assert_eq!(ok.spoken(), vec!["hello".to_string()]);

        let failing = MockSynthesizer::failing();
        assert!(failing.speak("hello").await.is_err());
        assert_eq!(failing.spoken().len(), 1);
    }
}

//! Typed-answer recognizer.
//!
//! Treats each line of input as one transcript, so a drill can be played
//! from a terminal or driven by a pipe. Lines are read on a dedicated thread
//! so that an abandoned read never holds up runtime shutdown.

use std::io::BufRead;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::instrument;

use vocalmath_core::traits::{SpeechToText, TranscribeRequest, Transcript};

/// Recognizer that "hears" lines of text.
pub struct LineTranscriber {
    lines: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl LineTranscriber {
    /// Read answers from standard input.
    pub fn stdin() -> Self {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()))
    }

    /// Read answers from any line-oriented reader.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Self {
            lines: Mutex::new(rx),
        }
    }
}

#[async_trait]
impl SpeechToText for LineTranscriber {
    fn name(&self) -> &str {
        "stdin"
    }

    #[instrument(skip(self, request), fields(attempt = request.attempt))]
    async fn transcribe(&self, request: &TranscribeRequest) -> Result<Transcript> {
        let start = Instant::now();
        let mut lines = self.lines.lock().await;

        let text = match tokio::time::timeout(request.window, lines.recv()).await {
            Ok(Some(line)) => line.trim().to_string(),
            Ok(None) => {
                tracing::debug!("input closed, nothing heard");
                String::new()
            }
            Err(_) => {
                tracing::debug!("no answer within the recording window");
                String::new()
            }
        };

        Ok(Transcript {
            text,
            partial: false,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};
    use std::time::Duration;

    use vocalmath_core::DifficultyLevel;

    use super::*;

    fn request(window: Duration) -> TranscribeRequest {
        TranscribeRequest {
            window,
            difficulty: DifficultyLevel::EASY,
            problem: "7 + 3".into(),
            attempt: 1,
        }
    }

    #[tokio::test]
    async fn reads_one_line_per_request() {
        let transcriber = LineTranscriber::from_reader(Cursor::new("  ten \nminus four\n"));
        let window = Duration::from_secs(5);

        let first = transcriber.transcribe(&request(window)).await.unwrap();
        assert_eq!(first.text, "ten");
        assert_eq!(
            transcriber.transcribe(&request(window)).await.unwrap().text,
            "minus four"
        );
        // Input exhausted.
        let last = transcriber.transcribe(&request(window)).await.unwrap();
        assert_eq!(last.text, "");
    }

    /// Reader that produces a single line after a delay.
    struct SlowReader {
        delay: Duration,
        data: Cursor<&'static [u8]>,
        waited: bool,
    }

    impl Read for SlowReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.waited {
                std::thread::sleep(self.delay);
                self.waited = true;
            }
            self.data.read(buf)
        }
    }

    #[tokio::test]
    async fn window_elapses_without_input() {
        let reader = SlowReader {
            delay: Duration::from_millis(300),
            data: Cursor::new(&b"seven\n"[..]),
            waited: false,
        };
        let transcriber = LineTranscriber::from_reader(std::io::BufReader::new(reader));

        let transcript = transcriber
            .transcribe(&request(Duration::from_millis(20)))
            .await
            .unwrap();
        assert_eq!(transcript.text, "");

        // The line arrives later and is heard by the next request.
        let transcript = transcriber
            .transcribe(&request(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(transcript.text, "seven");
    }
}

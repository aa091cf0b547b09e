//! Collaborators backed by external programs.
//!
//! A recognizer command is given the recording window in seconds and prints
//! what it heard on stdout, either as plain text or as a Vosk-style JSON
//! result (`{"text": "..."}` or `{"partial": "..."}`). A synthesizer command
//! is given the text to read aloud.

use std::process::Stdio;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::instrument;

use vocalmath_core::traits::{SpeechSynthesizer, SpeechToText, TranscribeRequest, Transcript};

use crate::error::SpeechError;

/// Replaced by the recording window in whole seconds.
pub const SECONDS_PLACEHOLDER: &str = "{seconds}";
/// Replaced by the display form of the problem.
pub const PROBLEM_PLACEHOLDER: &str = "{problem}";
/// Replaced by the text to speak.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Extra time a recognizer gets beyond its recording window.
const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Recognizer that shells out to an external speech-to-text program.
pub struct CommandTranscriber {
    program: String,
    args: Vec<String>,
    grace: Duration,
}

impl CommandTranscriber {
    pub fn new(program: &str, args: Vec<String>) -> Result<Self, SpeechError> {
        if program.trim().is_empty() {
            return Err(SpeechError::InvalidConfig(
                "recognizer program is empty".into(),
            ));
        }
        Ok(Self {
            program: program.to_string(),
            args,
            grace: DEFAULT_GRACE,
        })
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    fn args_for(&self, request: &TranscribeRequest) -> Vec<String> {
        let seconds = request.window.as_secs().max(1).to_string();
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace(SECONDS_PLACEHOLDER, &seconds)
                    .replace(PROBLEM_PLACEHOLDER, &request.problem)
            })
            .collect();

        if self.args.iter().any(|a| a.contains(SECONDS_PLACEHOLDER)) {
            args
        } else {
            args.into_iter().chain(std::iter::once(seconds)).collect()
        }
    }
}

#[async_trait]
impl SpeechToText for CommandTranscriber {
    fn name(&self) -> &str {
        &self.program
    }

    #[instrument(skip(self, request), fields(program = %self.program, attempt = request.attempt))]
    async fn transcribe(&self, request: &TranscribeRequest) -> Result<Transcript> {
        let start = Instant::now();
        let limit = request.window.saturating_add(self.grace);

        let stdout = match run(&self.program, &self.args_for(request), limit).await {
            Ok(stdout) => stdout,
            Err(e) if !e.is_permanent() => {
                tracing::warn!("recognizer attempt failed, treating as silence: {e}");
                String::new()
            }
            Err(e) => return Err(e.into()),
        };
        let mut transcript = parse_recognizer_output(&stdout);
        transcript.latency_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(text = %transcript.text, partial = transcript.partial, "recognizer output");
        Ok(transcript)
    }
}

/// Synthesizer that shells out to an external text-to-speech program.
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandSynthesizer {
    pub fn new(program: &str, args: Vec<String>) -> Result<Self, SpeechError> {
        if program.trim().is_empty() {
            return Err(SpeechError::InvalidConfig(
                "synthesizer program is empty".into(),
            ));
        }
        Ok(Self {
            program: program.to_string(),
            args,
            timeout: Duration::from_secs(30),
        })
    }

    fn args_for(&self, text: &str) -> Vec<String> {
        if self.args.iter().any(|a| a.contains(TEXT_PLACEHOLDER)) {
            self.args
                .iter()
                .map(|arg| arg.replace(TEXT_PLACEHOLDER, text))
                .collect()
        } else {
            let mut args = self.args.clone();
            args.push(text.to_string());
            args
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    fn name(&self) -> &str {
        &self.program
    }

    #[instrument(skip(self, text), fields(program = %self.program))]
    async fn speak(&self, text: &str) -> Result<()> {
        run(&self.program, &self.args_for(text), self.timeout).await?;
        Ok(())
    }
}

/// Run a program to completion and return its stdout.
async fn run(program: &str, args: &[String], limit: Duration) -> Result<String, SpeechError> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(limit, cmd.output())
        .await
        .map_err(|_| SpeechError::Timeout {
            program: program.to_string(),
            secs: limit.as_secs(),
        })?
        .map_err(|source| SpeechError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(SpeechError::CommandFailed {
            program: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Interpret recognizer stdout.
///
/// A JSON object with a `text` field is a final result, one with only a
/// `partial` field is a partial result, and anything else is taken as plain
/// text.
pub fn parse_recognizer_output(output: &str) -> Transcript {
    let trimmed = output.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(text) = value.get("text").and_then(|t| t.as_str()) {
            return Transcript::new(text.trim());
        }
        if let Some(text) = value.get("partial").and_then(|t| t.as_str()) {
            return Transcript {
                text: text.trim().to_string(),
                partial: true,
                latency_ms: 0,
            };
        }
        if value.is_object() {
            return Transcript::empty();
        }
    }

    // Some recognizers print one line per utterance; the last one wins.
    Transcript::new(trimmed.lines().last().unwrap_or("").trim())
}

//! Drill orchestrator.
//!
//! Owns the generator, the answer resolver and both speech collaborators for
//! the lifetime of a drill, and walks one [`Session`] through repeated
//! problems.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::Rng;

use crate::generator::ExpressionGenerator;
use crate::model::{DifficultyLevel, Expression};
use crate::report::{DrillReport, RoundOutcome};
use crate::resolver::AnswerResolver;
use crate::session::{Session, Verdict};
use crate::traits::{
    spoken_prompt, SpeechSynthesizer, SpeechToText, TranscribeRequest, REPEAT_PROMPT,
};

/// Configuration for a drill.
#[derive(Debug, Clone)]
pub struct DrillConfig {
    /// Difficulty of generated problems.
    pub difficulty: DifficultyLevel,
    /// Listening attempts per problem before it counts as unanswered.
    pub max_attempts: u32,
    /// Read each problem aloud through the synthesizer.
    pub speak_prompts: bool,
    /// Recording window at the easiest level.
    pub easy_window: Duration,
    /// Recording window above the easiest level.
    pub hard_window: Duration,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyLevel::EASY,
            max_attempts: 3,
            speak_prompts: false,
            easy_window: Duration::from_secs(5),
            hard_window: Duration::from_secs(10),
        }
    }
}

impl DrillConfig {
    /// How long to listen for an answer at the given difficulty.
    pub fn recording_window(&self, difficulty: DifficultyLevel) -> Duration {
        if difficulty == DifficultyLevel::EASY {
            self.easy_window
        } else {
            self.hard_window
        }
    }
}

/// Progress reporting trait.
pub trait DrillObserver: Send + Sync {
    fn on_problem(&self, round: usize, expression: &Expression);
    fn on_listening(&self, attempt: u32, window: Duration);
    fn on_heard(&self, transcript: &str, resolved: Option<i64>);
    fn on_round_complete(&self, outcome: &RoundOutcome);
}

/// No-op drill observer.
pub struct NoopObserver;

impl DrillObserver for NoopObserver {
    fn on_problem(&self, _: usize, _: &Expression) {}
    fn on_listening(&self, _: u32, _: Duration) {}
    fn on_heard(&self, _: &str, _: Option<i64>) {}
    fn on_round_complete(&self, _: &RoundOutcome) {}
}

/// An interactive arithmetic drill.
pub struct Drill<R = StdRng> {
    generator: ExpressionGenerator<R>,
    resolver: AnswerResolver,
    transcriber: Arc<dyn SpeechToText>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: DrillConfig,
    session: Session,
}

impl<R: Rng> Drill<R> {
    pub fn new(
        generator: ExpressionGenerator<R>,
        transcriber: Arc<dyn SpeechToText>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: DrillConfig,
    ) -> Self {
        Self {
            generator,
            resolver: AnswerResolver::new(),
            transcriber,
            synthesizer,
            config,
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.config.difficulty
    }

    /// Change the difficulty used by the next generated problem.
    pub fn set_difficulty(&mut self, difficulty: DifficultyLevel) {
        self.config.difficulty = difficulty;
    }

    /// The current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Play a single problem: show it, listen, resolve and judge.
    pub async fn run_round(
        &mut self,
        round: usize,
        observer: &dyn DrillObserver,
    ) -> Result<RoundOutcome> {
        let start = Instant::now();
        let difficulty = self.config.difficulty;

        let expression = self.generator.generate(difficulty)?;
        self.session = self.session.with_problem(expression);
        observer.on_problem(round, &expression);

        if self.config.speak_prompts {
            self.say(&spoken_prompt(&expression)).await;
        }

        let window = self.config.recording_window(difficulty);
        let max_attempts = self.config.max_attempts.max(1);
        let mut transcripts = Vec::new();
        let mut verdict = Verdict::Unresolved;
        let mut attempts = 0;

        while attempts < max_attempts {
            attempts += 1;
            observer.on_listening(attempts, window);

            let request = TranscribeRequest {
                window,
                difficulty,
                problem: expression.display(),
                attempt: attempts,
            };
            let transcript = self
                .transcriber
                .transcribe(&request)
                .await
                .with_context(|| format!("{} failed to transcribe", self.transcriber.name()))?;

            let resolved = self.resolver.resolve(&transcript.text);
            observer.on_heard(&transcript.text, resolved);
            transcripts.push(transcript.text);

            let (next, outcome) = self.session.submit(resolved)?;
            self.session = next;
            verdict = outcome;

            if verdict != Verdict::Unresolved {
                break;
            }
            if self.config.speak_prompts && attempts < max_attempts {
                self.say(REPEAT_PROMPT).await;
            }
        }

        let outcome = RoundOutcome {
            round,
            expression,
            transcripts,
            answer: self.session.answer(),
            verdict,
            attempts,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            session = %self.session.id(),
            round,
            expression = %expression,
            answer = ?outcome.answer,
            ?verdict,
            "round complete"
        );
        observer.on_round_complete(&outcome);
        Ok(outcome)
    }

    /// Play `rounds` problems in a row and collect a report.
    pub async fn run(
        &mut self,
        rounds: usize,
        observer: &dyn DrillObserver,
    ) -> Result<DrillReport> {
        let start = Instant::now();
        let mut outcomes = Vec::with_capacity(rounds);

        for round in 1..=rounds {
            outcomes.push(self.run_round(round, observer).await?);
        }

        self.session = self.session.reset();
        Ok(DrillReport::new(
            self.config.difficulty,
            outcomes,
            start.elapsed().as_millis() as u64,
        ))
    }

    /// Release both speech collaborators.
    pub async fn shutdown(self) -> Result<()> {
        self.transcriber
            .shutdown()
            .await
            .context("failed to shut down recognizer")?;
        self.synthesizer
            .shutdown()
            .await
            .context("failed to shut down synthesizer")?;
        Ok(())
    }

    async fn say(&self, text: &str) {
        if let Err(e) = self.synthesizer.speak(text).await {
            tracing::warn!("{} could not speak prompt: {e:#}", self.synthesizer.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::traits::Transcript;

    /// Recognizer that always hears the same words.
    struct Parrot {
        words: &'static str,
        calls: AtomicU32,
    }

    #[async_trait]
    impl SpeechToText for Parrot {
        fn name(&self) -> &str {
            "parrot"
        }

        async fn transcribe(&self, _: &TranscribeRequest) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(Transcript::new(self.words))
        }
    }

    struct Mute;

    #[async_trait]
    impl SpeechSynthesizer for Mute {
        fn name(&self) -> &str {
            "mute"
        }

        async fn speak(&self, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn drill(words: &'static str, config: DrillConfig) -> (Drill, Arc<Parrot>) {
        let parrot = Arc::new(Parrot {
            words,
            calls: AtomicU32::new(0),
        });
        let drill = Drill::new(
            ExpressionGenerator::from_seed(3),
            parrot.clone(),
            Arc::new(Mute),
            config,
        );
        (drill, parrot)
    }

    #[tokio::test]
    async fn zero_attempts_still_listens_once() {
        let config = DrillConfig {
            max_attempts: 0,
            ..DrillConfig::default()
        };
        let (mut drill, parrot) = drill("banana", config);

        let outcome = drill.run_round(1, &NoopObserver).await.unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.verdict, Verdict::Unresolved);
        assert_eq!(parrot.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn set_difficulty_applies_to_next_round() {
        let (mut drill, _) = drill("zero", DrillConfig::default());
        drill.set_difficulty(DifficultyLevel::HARD);
        assert_eq!(drill.difficulty(), DifficultyLevel::HARD);

        let report = drill.run(2, &NoopObserver).await.unwrap();
        assert_eq!(report.difficulty, DifficultyLevel::HARD);
        for round in &report.rounds {
            let (low, high) = DifficultyLevel::HARD.magnitude_range();
            assert!((low..=high).contains(&round.expression.operand_a()));
        }
    }

    #[test]
    fn recording_window_by_difficulty() {
        let config = DrillConfig::default();
        assert_eq!(
            config.recording_window(DifficultyLevel::EASY),
            Duration::from_secs(5)
        );
        assert_eq!(
            config.recording_window(DifficultyLevel::MEDIUM),
            Duration::from_secs(10)
        );
        assert_eq!(
            config.recording_window(DifficultyLevel::HARD),
            Duration::from_secs(10)
        );
    }
}

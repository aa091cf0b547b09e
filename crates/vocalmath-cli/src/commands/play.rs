//! The `vocalmath play` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use vocalmath_core::drill::{Drill, DrillObserver};
use vocalmath_core::report::{DrillReport, RoundOutcome};
use vocalmath_core::traits::{SpeechSynthesizer, SpeechToText};
use vocalmath_core::{DifficultyLevel, Expression, ExpressionGenerator, Verdict};
use vocalmath_speech::config::load_config_from;
use vocalmath_speech::{create_synthesizer, create_transcriber};

/// Console progress observer.
struct ConsoleObserver;

impl DrillObserver for ConsoleObserver {
    fn on_problem(&self, round: usize, expression: &Expression) {
        eprintln!("\nProblem {round}: {expression} = ?");
    }

    fn on_listening(&self, attempt: u32, window: Duration) {
        if attempt > 1 {
            eprintln!("  Didn't catch that, try again (attempt {attempt})");
        }
        eprintln!("  Listening for {}s...", window.as_secs());
    }

    fn on_heard(&self, transcript: &str, resolved: Option<i64>) {
        match resolved {
            Some(n) => eprintln!("  Heard: \"{transcript}\" -> {n}"),
            None => eprintln!("  Heard: \"{transcript}\" -> ?"),
        }
    }

    fn on_round_complete(&self, outcome: &RoundOutcome) {
        let value = outcome.expression.value();
        match outcome.verdict {
            Verdict::Correct => eprintln!("  Correct!"),
            Verdict::Incorrect => eprintln!("  Incorrect, the answer is {value}"),
            Verdict::Unresolved => eprintln!("  No answer, the answer is {value}"),
        }
    }
}

pub async fn execute(
    difficulty: Option<u32>,
    rounds: Option<usize>,
    seed: Option<u64>,
    speak: bool,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut drill_config = config.drill_config();
    if let Some(level) = difficulty {
        drill_config.difficulty = DifficultyLevel::new(level)?;
    }
    if speak {
        drill_config.speak_prompts = true;
    }
    let rounds = rounds.unwrap_or(config.rounds);
    anyhow::ensure!(rounds >= 1, "rounds must be at least 1");

    let generator = match seed.or(config.seed) {
        Some(seed) => ExpressionGenerator::from_seed(seed),
        None => ExpressionGenerator::from_os_rng(),
    };
    let transcriber: Arc<dyn SpeechToText> = Arc::from(create_transcriber(&config.transcriber)?);
    let synthesizer: Arc<dyn SpeechSynthesizer> =
        Arc::from(create_synthesizer(&config.synthesizer)?);

    eprintln!(
        "vocalmath v{}: {} problems at difficulty {} (recognizer: {}, voice: {})",
        env!("CARGO_PKG_VERSION"),
        rounds,
        drill_config.difficulty,
        transcriber.name(),
        synthesizer.name(),
    );

    let mut drill = Drill::new(generator, transcriber, synthesizer, drill_config);
    let report = drill.run(rounds, &ConsoleObserver).await;
    drill.shutdown().await?;
    let report = report?;

    print_summary(&report);

    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        report.save_json(&path)?;
        eprintln!("Results saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &DrillReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Problem", "Heard", "Answer", "Expected", "Result"]);

    for round in &report.rounds {
        let heard = round
            .transcripts
            .iter()
            .rev()
            .find(|t| !t.is_empty())
            .cloned()
            .unwrap_or_default();
        let answer = round.answer.map(|a| a.to_string()).unwrap_or_default();
        let result = match round.verdict {
            Verdict::Correct => "correct",
            Verdict::Incorrect => "incorrect",
            Verdict::Unresolved => "unanswered",
        };
        table.add_row(vec![
            Cell::new(round.round),
            Cell::new(round.expression),
            Cell::new(heard),
            Cell::new(answer),
            Cell::new(round.expression.value()),
            Cell::new(result),
        ]);
    }

    let summary = &report.summary;
    eprintln!("\n{table}");
    eprintln!(
        "\nScore: {}/{} correct ({:.1}%), {} incorrect, {} unanswered ({:.1}s)",
        summary.correct,
        summary.rounds,
        summary.accuracy * 100.0,
        summary.incorrect,
        summary.unanswered,
        report.duration_ms as f64 / 1000.0,
    );
}

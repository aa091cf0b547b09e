//! Drill report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{DifficultyLevel, Expression};
use crate::session::Verdict;

/// The result of one problem in a drill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// 1-based round number.
    pub round: usize,
    /// The problem that was asked.
    pub expression: Expression,
    /// Everything the recognizer heard, one entry per attempt.
    pub transcripts: Vec<String>,
    /// The resolved answer that was judged, if any.
    pub answer: Option<i64>,
    /// `Unresolved` when every attempt was unintelligible.
    pub verdict: Verdict,
    /// Number of listening attempts used.
    pub attempts: u32,
    /// Wall-clock time for the round in milliseconds.
    pub duration_ms: u64,
}

/// Aggregate counts over a drill's rounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrillSummary {
    pub rounds: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    /// Correct rounds as a fraction of all rounds.
    pub accuracy: f64,
}

impl DrillSummary {
    pub fn from_rounds(rounds: &[RoundOutcome]) -> Self {
        let count = |verdict: Verdict| rounds.iter().filter(|r| r.verdict == verdict).count();
        let correct = count(Verdict::Correct);
        let accuracy = if rounds.is_empty() {
            0.0
        } else {
            correct as f64 / rounds.len() as f64
        };

        Self {
            rounds: rounds.len(),
            correct,
            incorrect: count(Verdict::Incorrect),
            unanswered: count(Verdict::Unresolved),
            accuracy,
        }
    }
}

/// A complete drill report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Difficulty the drill finished at.
    pub difficulty: DifficultyLevel,
    /// Individual round results.
    pub rounds: Vec<RoundOutcome>,
    /// Aggregate counts.
    pub summary: DrillSummary,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl DrillReport {
    pub fn new(difficulty: DifficultyLevel, rounds: Vec<RoundOutcome>, duration_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            difficulty,
            summary: DrillSummary::from_rounds(&rounds),
            rounds,
            duration_ms,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: DrillReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operator;

    fn outcome(round: usize, verdict: Verdict) -> RoundOutcome {
        RoundOutcome {
            round,
            expression: Expression::new(7, Operator::Add, 3).unwrap(),
            transcripts: vec!["ten".into()],
            answer: Some(10),
            verdict,
            attempts: 1,
            duration_ms: 5,
        }
    }

    #[test]
    fn summary_counts_verdicts() {
        let rounds = vec![
            outcome(1, Verdict::Correct),
            outcome(2, Verdict::Incorrect),
            outcome(3, Verdict::Correct),
            outcome(4, Verdict::Unresolved),
        ];
        let summary = DrillSummary::from_rounds(&rounds);
        assert_eq!(summary.rounds, 4);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.unanswered, 1);
        assert!((summary.accuracy - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_summary_has_zero_accuracy() {
        let summary = DrillSummary::from_rounds(&[]);
        assert_eq!(summary.rounds, 0);
        assert_eq!(summary.accuracy, 0.0);
    }

    #[test]
    fn json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("drill.json");

        let report = DrillReport::new(
            DifficultyLevel::EASY,
            vec![outcome(1, Verdict::Correct)],
            42,
        );
        report.save_json(&path).unwrap();

        let loaded = DrillReport::load_json(&path).unwrap();
        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.rounds, report.rounds);
        assert_eq!(loaded.summary, report.summary);
    }
}

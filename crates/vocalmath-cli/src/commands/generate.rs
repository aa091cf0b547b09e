//! The `vocalmath generate` command.

use anyhow::Result;
use serde::Serialize;

use vocalmath_core::{DifficultyLevel, Expression, ExpressionGenerator};

/// One generated problem as printed by `--format json`.
#[derive(Serialize)]
struct GeneratedProblem {
    problem: String,
    canonical: String,
    answer: i64,
}

impl From<&Expression> for GeneratedProblem {
    fn from(expression: &Expression) -> Self {
        Self {
            problem: expression.display(),
            canonical: expression.canonical(),
            answer: expression.value(),
        }
    }
}

pub fn execute(difficulty: u32, count: usize, seed: Option<u64>, format: String) -> Result<()> {
    let difficulty = DifficultyLevel::new(difficulty)?;
    let mut generator = match seed {
        Some(seed) => ExpressionGenerator::from_seed(seed),
        None => ExpressionGenerator::from_os_rng(),
    };

    let expressions = (0..count)
        .map(|_| generator.generate(difficulty))
        .collect::<Result<Vec<_>, _>>()?;

    match format.as_str() {
        "text" => {
            for expression in &expressions {
                println!("{expression} = {}", expression.value());
            }
        }
        "json" => {
            let problems: Vec<GeneratedProblem> = expressions.iter().map(Into::into).collect();
            println!("{}", serde_json::to_string_pretty(&problems)?);
        }
        other => anyhow::bail!("unknown format: '{other}' (expected text or json)"),
    }

    Ok(())
}

//! The `vocalmath check` command.

use anyhow::{Context, Result};

use vocalmath_core::{verify, AnswerResolver, Expression};

pub fn execute(expression: String, answer: String) -> Result<()> {
    let expression: Expression = expression
        .parse()
        .with_context(|| format!("invalid expression '{expression}'"))?;

    let verdict = match AnswerResolver::new().resolve(&answer) {
        None => "unresolved",
        Some(n) if verify(&expression, n) => "correct",
        Some(_) => "incorrect",
    };
    println!("{verdict}");
    Ok(())
}

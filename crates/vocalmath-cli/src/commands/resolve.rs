//! The `vocalmath resolve` command.

use anyhow::Result;

use vocalmath_core::AnswerResolver;

pub fn execute(text: Vec<String>) -> Result<()> {
    let phrase = text.join(" ");
    match AnswerResolver::new().resolve(&phrase) {
        Some(n) => println!("{n}"),
        None => println!("unresolved"),
    }
    Ok(())
}

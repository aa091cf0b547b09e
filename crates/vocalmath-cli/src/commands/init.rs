//! The `vocalmath init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("vocalmath.toml").exists() {
        println!("vocalmath.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write("vocalmath.toml", SAMPLE_CONFIG)?;
    println!("Created vocalmath.toml");

    println!("\nNext steps:");
    println!("  1. Pick a recognizer and voice in vocalmath.toml");
    println!("  2. Run: vocalmath play --rounds 3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# vocalmath configuration

difficulty = 1
rounds = 5
max_attempts = 3
speak_prompts = false
easy_window_secs = 5
hard_window_secs = 10

# Type answers, one per line.
[transcriber]
type = "stdin"

# Or listen through an external recognizer that prints what it heard,
# as plain text or as {"text": "..."}:
#
# [transcriber]
# type = "command"
# program = "${HOME}/bin/listen"
# args = ["--seconds", "{seconds}"]

[synthesizer]
type = "console"

# Or read prompts aloud:
#
# [synthesizer]
# type = "command"
# program = "espeak"
# args = ["{text}"]
"#;

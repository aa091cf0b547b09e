//! Drill configuration and collaborator factories.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vocalmath_core::drill::DrillConfig;
use vocalmath_core::traits::{SpeechSynthesizer, SpeechToText};
use vocalmath_core::DifficultyLevel;

use crate::command::{CommandSynthesizer, CommandTranscriber};
use crate::console::{ConsoleSynthesizer, SilentSynthesizer};
use crate::mock::MockTranscriber;
use crate::stdin::LineTranscriber;

/// Which recognizer hears the answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranscriberConfig {
    /// Typed answers, one per line.
    Stdin,
    /// An external speech-to-text program.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
        /// Seconds allowed beyond the recording window.
        #[serde(default = "default_grace_secs")]
        grace_secs: u64,
    },
    /// Scripted transcripts, for demos and tests.
    Mock {
        #[serde(default)]
        transcripts: Vec<String>,
    },
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        TranscriberConfig::Stdin
    }
}

/// Which synthesizer reads prompts aloud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SynthesizerConfig {
    /// Print prompts to stderr.
    Console,
    /// Drop prompts.
    Silent,
    /// An external text-to-speech program.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        SynthesizerConfig::Console
    }
}

fn default_grace_secs() -> u64 {
    5
}

/// Top-level vocalmath configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalMathConfig {
    /// Starting difficulty level.
    #[serde(default)]
    pub difficulty: DifficultyLevel,
    /// Problems per drill.
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Listening attempts per problem.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Read problems aloud.
    #[serde(default)]
    pub speak_prompts: bool,
    /// Recording window at the easiest level, in seconds.
    #[serde(default = "default_easy_window")]
    pub easy_window_secs: u64,
    /// Recording window at harder levels, in seconds.
    #[serde(default = "default_hard_window")]
    pub hard_window_secs: u64,
    /// Seed for reproducible problem sequences.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub transcriber: TranscriberConfig,
    #[serde(default)]
    pub synthesizer: SynthesizerConfig,
}

fn default_rounds() -> usize {
    5
}
fn default_max_attempts() -> u32 {
    3
}
fn default_easy_window() -> u64 {
    5
}
fn default_hard_window() -> u64 {
    10
}

impl Default for VocalMathConfig {
    fn default() -> Self {
        Self {
            difficulty: DifficultyLevel::default(),
            rounds: default_rounds(),
            max_attempts: default_max_attempts(),
            speak_prompts: false,
            easy_window_secs: default_easy_window(),
            hard_window_secs: default_hard_window(),
            seed: None,
            transcriber: TranscriberConfig::default(),
            synthesizer: SynthesizerConfig::default(),
        }
    }
}

impl VocalMathConfig {
    /// The drill settings described by this configuration.
    pub fn drill_config(&self) -> DrillConfig {
        DrillConfig {
            difficulty: self.difficulty,
            max_attempts: self.max_attempts,
            speak_prompts: self.speak_prompts,
            easy_window: Duration::from_secs(self.easy_window_secs),
            hard_window: Duration::from_secs(self.hard_window_secs),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_args(args: &[String]) -> Vec<String> {
    args.iter().map(|a| resolve_env_vars(a)).collect()
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `vocalmath.toml` in the current directory
/// 2. `~/.config/vocalmath/config.toml`
///
/// Environment variable overrides: `VOCALMATH_DIFFICULTY`, `VOCALMATH_SEED`.
pub fn load_config() -> Result<VocalMathConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<VocalMathConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("vocalmath.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<VocalMathConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => VocalMathConfig::default(),
    };

    // Apply env var overrides
    if let Ok(level) = std::env::var("VOCALMATH_DIFFICULTY") {
        let level: u32 = level
            .trim()
            .parse()
            .with_context(|| format!("invalid VOCALMATH_DIFFICULTY: '{level}'"))?;
        config.difficulty = DifficultyLevel::new(level)?;
    }
    if let Ok(seed) = std::env::var("VOCALMATH_SEED") {
        config.seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("invalid VOCALMATH_SEED: '{seed}'"))?,
        );
    }

    // Resolve env vars in command collaborators
    if let TranscriberConfig::Command { program, args, .. } = &mut config.transcriber {
        *program = resolve_env_vars(program);
        *args = resolve_args(args);
    }
    if let SynthesizerConfig::Command { program, args } = &mut config.synthesizer {
        *program = resolve_env_vars(program);
        *args = resolve_args(args);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("vocalmath"))
}

/// Create a recognizer from its configuration.
pub fn create_transcriber(config: &TranscriberConfig) -> Result<Box<dyn SpeechToText>> {
    match config {
        TranscriberConfig::Stdin => Ok(Box::new(LineTranscriber::stdin())),
        TranscriberConfig::Command {
            program,
            args,
            grace_secs,
        } => Ok(Box::new(
            CommandTranscriber::new(program, args.clone())?
                .with_grace(Duration::from_secs(*grace_secs)),
        )),
        TranscriberConfig::Mock { transcripts } => {
            Ok(Box::new(MockTranscriber::new(transcripts.clone())))
        }
    }
}

/// Create a synthesizer from its configuration.
pub fn create_synthesizer(config: &SynthesizerConfig) -> Result<Box<dyn SpeechSynthesizer>> {
    match config {
        SynthesizerConfig::Console => Ok(Box::new(ConsoleSynthesizer)),
        SynthesizerConfig::Silent => Ok(Box::new(SilentSynthesizer)),
        SynthesizerConfig::Command { program, args } => {
            Ok(Box::new(CommandSynthesizer::new(program, args.clone())?))
        }
    }
}

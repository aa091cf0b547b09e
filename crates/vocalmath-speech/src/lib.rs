//! vocalmath-speech — speech collaborators and configuration.
//!
//! Implements the `SpeechToText` and `SpeechSynthesizer` traits for typed
//! answers, external recognizer and synthesizer programs, and scripted mocks,
//! and loads the drill configuration that selects between them.

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod mock;
pub mod stdin;

pub use config::{
    create_synthesizer, create_transcriber, load_config, SynthesizerConfig, TranscriberConfig,
    VocalMathConfig,
};
pub use error::SpeechError;

//! Speech collaborator error types.

use thiserror::Error;

/// Errors that can occur when driving an external speech program.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The program could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The program did not finish in time.
    #[error("`{program}` timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// The collaborator configuration is unusable.
    #[error("invalid speech configuration: {0}")]
    InvalidConfig(String),
}

impl SpeechError {
    /// Returns `true` if this error is permanent and retrying cannot help.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SpeechError::Spawn { .. } | SpeechError::InvalidConfig(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence() {
        assert!(SpeechError::InvalidConfig("empty program".into()).is_permanent());
        assert!(!SpeechError::Timeout {
            program: "vosk".into(),
            secs: 15
        }
        .is_permanent());
    }
}

use thiserror::Error;

/// Main error type for the crt-overlay library
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Stage processing error: {0}")]
    Stage(#[from] StageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Configuration-specific errors
///
/// These are the only errors surfaced to the caller at construction time;
/// when one is raised no pipeline is created and no frames are produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("There is no effect of type \"{name}\" defined")]
    UnknownEffect { name: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Per-frame stage errors
///
/// All of these are local to a single produced frame. The scheduling loop
/// logs them and keeps running.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Blur capability is not loaded yet")]
    BlurUnavailable,

    #[error("Blur failed: {reason}")]
    BlurFailed { reason: String },

    #[error("Frame sampling failed: {reason}")]
    SampleFailed { reason: String },

    #[error("Presenting frame failed: {reason}")]
    PresentFailed { reason: String },
}

/// Convenience type alias for Results using OverlayError
pub type Result<T> = std::result::Result<T, OverlayError>;

impl OverlayError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (the frame loop may continue)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The blur dependency may simply not have finished loading
            Self::Stage(StageError::BlurUnavailable) => true,
            // A single bad frame does not invalidate the next one
            Self::Stage(StageError::SampleFailed { .. }) => true,
            Self::Stage(StageError::BlurFailed { .. }) => true,
            // Configuration problems halt setup
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(ConfigError::UnknownEffect { name }) => {
                format!("Effect \"{}\" is not defined. Available effects: blur", name)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Stage(StageError::BlurUnavailable) => {
                "The blur capability has not finished loading; frames are rendered unblurred until it does.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

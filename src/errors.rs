use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur in the drawing engine and its collaborators
#[derive(Error, Debug)]
pub enum DrawError {
    /// A serialized command payload could not be decoded
    #[error("Malformed command payload for {command_type}: {message}")]
    MalformedCommand {
        command_type: Arc<String>,
        message: Arc<String>,
    },

    /// A command is missing a field it needs to be drawn
    #[error("Required field missing: {field} on {command_type}")]
    MissingField {
        command_type: Arc<String>,
        field: &'static str,
    },

    /// The command generator could not produce commands
    #[error("Generation failed: {0}")]
    Generation(Arc<String>),

    /// Network error talking to a remote collaborator
    #[error("Network error: {0}")]
    Network(Arc<String>),

    /// Error reading or writing the drawing store
    #[error("Storage error at {path}: {message}")]
    Storage { path: PathBuf, message: Arc<String> },

    /// A drawing id was not found in the store
    #[error("Drawing not found: {0}")]
    DrawingNotFound(u64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(Arc<String>),

    /// Error when serializing data
    #[error("Serialization error: {0}")]
    Serialization(Arc<String>),

    /// Error when deserializing data
    #[error("Deserialization error: {0}")]
    Deserialization(Arc<String>),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(Arc<String>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with `DrawError`
pub type Result<T> = std::result::Result<T, DrawError>;

impl DrawError {
    pub fn malformed(command_type: &str, message: impl ToString) -> Self {
        DrawError::MalformedCommand {
            command_type: Arc::new(command_type.to_string()),
            message: Arc::new(message.to_string()),
        }
    }

    pub fn missing(command_type: &str, field: &'static str) -> Self {
        DrawError::MissingField {
            command_type: Arc::new(command_type.to_string()),
            field,
        }
    }

    pub fn storage(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        DrawError::Storage {
            path: path.into(),
            message: Arc::new(message.to_string()),
        }
    }

    pub fn generation(message: impl ToString) -> Self {
        DrawError::Generation(Arc::new(message.to_string()))
    }

    pub fn config(message: impl ToString) -> Self {
        DrawError::Configuration(Arc::new(message.to_string()))
    }

    /// Whether a rendering session can keep going after this error.
    ///
    /// Payload problems only cost the one command they belong to.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DrawError::MalformedCommand { .. } | DrawError::MissingField { .. }
        )
    }
}

impl From<serde_json::Error> for DrawError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_data() || error.is_syntax() || error.is_eof() {
            DrawError::Deserialization(Arc::new(error.to_string()))
        } else {
            DrawError::Serialization(Arc::new(error.to_string()))
        }
    }
}

impl From<image::ImageError> for DrawError {
    fn from(error: image::ImageError) -> Self {
        DrawError::Serialization(Arc::new(format!("Image encoding failed: {error}")))
    }
}

impl From<reqwest::Error> for DrawError {
    fn from(error: reqwest::Error) -> Self {
        DrawError::Network(Arc::new(error.to_string()))
    }
}

/// Conversion from anyhow::Error to DrawError
impl From<anyhow::Error> for DrawError {
    fn from(error: anyhow::Error) -> Self {
        if let Some(err) = error.downcast_ref::<DrawError>() {
            return err.clone();
        }
        DrawError::Generation(Arc::new(format!("{error:#}")))
    }
}

/// Enable cloning for DrawError
impl Clone for DrawError {
    fn clone(&self) -> Self {
        match self {
            Self::MalformedCommand {
                command_type,
                message,
            } => Self::MalformedCommand {
                command_type: Arc::clone(command_type),
                message: Arc::clone(message),
            },
            Self::MissingField {
                command_type,
                field,
            } => Self::MissingField {
                command_type: Arc::clone(command_type),
                field,
            },
            Self::Generation(msg) => Self::Generation(Arc::clone(msg)),
            Self::Network(msg) => Self::Network(Arc::clone(msg)),
            Self::Storage { path, message } => Self::Storage {
                path: path.clone(),
                message: Arc::clone(message),
            },
            Self::DrawingNotFound(id) => Self::DrawingNotFound(*id),
            Self::Configuration(msg) => Self::Configuration(Arc::clone(msg)),
            Self::Serialization(msg) => Self::Serialization(Arc::clone(msg)),
            Self::Deserialization(msg) => Self::Deserialization(Arc::clone(msg)),
            Self::InvalidInput(msg) => Self::InvalidInput(Arc::clone(msg)),
            Self::Io(err) => Self::Io(std::io::Error::new(err.kind(), err.to_string())),
        }
    }
}

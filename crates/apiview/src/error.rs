use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Resource already defined: {name}")]
    DuplicateResource { name: String },

    #[error("Expect Collection, Record or list, got {found}")]
    InvalidResource { found: String },

    #[error("Format not supported: {format}")]
    UnsupportedFormat { format: String },

    #[error("Serialization failed: {message}")]
    Serialization { message: String },
}

impl ViewError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors raised by a setter or factory rejecting its input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::DuplicateResource { .. })
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

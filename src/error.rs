/// Error types for Tab Organizer
use thiserror::Error;

/// Failures reported by the browser host (tabs, groups, windows, storage)
#[derive(Error, Debug)]
pub enum HostError {
    #[error("{operation} failed: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to convert {what}: {message}")]
    Conversion { what: &'static str, message: String },

    #[error("Tab not found: {0}")]
    TabNotFound(i32),
}

impl HostError {
    pub fn api(operation: &'static str, message: impl Into<String>) -> HostError {
        HostError::Api {
            operation,
            message: message.into(),
        }
    }

    pub fn conversion(what: &'static str, message: impl Into<String>) -> HostError {
        HostError::Conversion {
            what,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("No savable tabs found in the current window.")]
    NoSavableTabs,

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("Stored data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrganizerError>;

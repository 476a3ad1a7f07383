//! Lumen Settings
//!
//! The preference store behind the accessibility panel: typed setting
//! values, their storage keys, an async persistence interface, and the
//! controller that applies changes immediately or batches them behind an
//! explicit save.

pub mod controller;
pub mod keys;
pub mod settings;
pub mod storage;

pub use controller::{ControllerOptions, LoadReport, SaveMode, SettingsController};
pub use keys::SettingKey;
pub use settings::{SettingChange, Settings};
pub use storage::{MemoryStorage, StorageAdapter};

/// Stored string that does not belong to its setting's domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseValueError {
    #[error("unknown setting key: {0}")]
    UnknownKey(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Persistence adapter failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Parse(#[from] ParseValueError),

    #[error("invalid settings document: {0}")]
    Json(String),
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Json(err.to_string())
    }
}

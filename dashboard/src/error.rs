//! Error types for the dashboard state container.

use crate::types::Resource;
use optiflow_runtime::StoreError;
use thiserror::Error;

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// A data source could not produce a resource.
///
/// The message is what ends up in `errors[resource]`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Failed to fetch {resource}: {message}")]
pub struct FetchError {
    /// Resource that was requested
    pub resource: Resource,
    /// Human-readable reason
    pub message: String,
}

impl FetchError {
    /// Create a fetch error for `resource`.
    #[must_use]
    pub fn new(resource: Resource, message: impl Into<String>) -> Self {
        Self {
            resource,
            message: message.into(),
        }
    }
}

/// Reading or writing the persisted theme failed.
#[derive(Debug, Error)]
pub enum ThemeStorageError {
    /// The backing file could not be read or written.
    #[error("Theme file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid JSON for a theme.
    #[error("Theme file is malformed: {0}")]
    Format(#[from] serde_json::Error),

    /// The storage backend is not usable.
    #[error("Theme storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the dashboard facade.
///
/// Fetch failures are never reported here; they are recorded in state and
/// returned as [`FetchOutcome::Failed`](crate::actions::FetchOutcome::Failed).
#[derive(Debug, Error)]
pub enum DashboardError {
    // ═══════════════════════════════════════════════════════════
    // Caller Errors
    // ═══════════════════════════════════════════════════════════

    /// A resource name outside dashboard, orders, suppliers, procurement.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// A page id outside the navigation catalogue.
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// A theme name other than light or dark.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// `activate` was called while an earlier activation is still live.
    #[error("Dashboard is already activated")]
    AlreadyActive,

    // ═══════════════════════════════════════════════════════════
    // Infrastructure Errors
    // ═══════════════════════════════════════════════════════════

    /// The theme preference could not be read or written.
    #[error(transparent)]
    ThemeStorage(#[from] ThemeStorageError),

    /// The store rejected the action or timed out waiting for it.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable held something that does not parse.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Environment variable name
        key: String,
        /// Raw value found
        value: String,
    },

    /// A parsed value is outside the accepted range.
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

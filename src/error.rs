//! Error types shared across controllers and hosts

use thiserror::Error;

/// Failures raised while starting or running the page behavior.
///
/// Missing optional hooks are not errors: controllers degrade silently when
/// the markup lacks them. These variants cover the cases that do abort a
/// single controller (at startup) or a single dispatch (at runtime).
#[derive(Debug, Error)]
pub enum FolioError {
    /// A controller found its root hook but not an element it cannot work without
    #[error("missing required element `{selector}` for {controller}")]
    MissingElement {
        /// Controller that needed the element
        controller: &'static str,
        /// Selector that did not resolve
        selector: String,
    },

    /// Reading or writing the preference store failed
    #[error("preference store: {0}")]
    Store(#[from] StoreError),

    /// The configuration could not be used
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failures from a [`crate::store::PreferenceStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document was not valid JSON
    #[error("malformed preferences file: {0}")]
    Json(#[from] serde_json::Error),

    /// The host refused access (browser storage disabled or quota exceeded)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result alias used by controllers.
pub type Result<T, E = FolioError> = std::result::Result<T, E>;

//! Result and error types for the harness.

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while driving the application under test
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Page-level backend error (evaluation failed, stale handle, lost connection)
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// A wait condition never held within its timeout
    #[error("Element not found: no match for {query} satisfied '{condition}' within {timeout_ms}ms")]
    NotFound {
        /// The query that was polled
        query: String,
        /// The condition that never held
        condition: &'static str,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// An element rendered but its externally-generated content never arrived
    #[error("Generated content for {query} still empty after {timeout_ms}ms")]
    GenerationTimeout {
        /// The query whose value stayed empty
        query: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// A destructive action refused to run because its safety guard was not met
    #[error("Precondition for '{action}' not met: {reason}")]
    PreconditionFailed {
        /// The action that refused to run
        action: &'static str,
        /// Why the guard rejected it
        reason: String,
    },

    /// Wait policy rejected at construction time
    #[error("Invalid wait policy: {reason}")]
    InvalidPolicy {
        /// Why the policy is invalid
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Test-data collaborator error (user listing, fixture files)
    #[error("Test data error: {message}")]
    TestData {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Whether this is the waiter's not-found timeout.
    ///
    /// Probe-style call sites use this to turn the timeout into `false`
    /// instead of propagating it.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is the async-content generation timeout.
    #[must_use]
    pub const fn is_generation_timeout(&self) -> bool {
        matches!(self, Self::GenerationTimeout { .. })
    }
}

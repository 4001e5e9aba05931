//! Error types for session operations.

use satchel_cache::CacheError;
use thiserror::Error;

use crate::transport::TransportError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-specific errors.
///
/// Every variant carries the name of the component that raised it
/// (`CookieSession`, `HeaderSession`, `SessionBuilder`, ...), rendered as a
/// `[component]` tag in the message.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Missing collaborator or invalid configuration value
    #[error("[{component}] configuration error: {message}")]
    Config {
        component: &'static str,
        message: String,
    },

    /// The cache backend failed to read, write or delete
    #[error("[{component}] storage error: {source}")]
    Storage {
        component: &'static str,
        #[source]
        source: CacheError,
    },

    /// The payload could not be encoded or decoded
    #[error("[{component}] serialization error: {source}")]
    Serialization {
        component: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The transport rejected a cookie or header
    #[error("[{component}] transport error: {source}")]
    Transport {
        component: &'static str,
        #[source]
        source: TransportError,
    },
}

impl SessionError {
    /// Name of the component that raised the error.
    pub fn component(&self) -> &'static str {
        match self {
            SessionError::Config { component, .. }
            | SessionError::Storage { component, .. }
            | SessionError::Serialization { component, .. }
            | SessionError::Transport { component, .. } => component,
        }
    }

    pub(crate) fn config(component: &'static str, message: impl Into<String>) -> Self {
        SessionError::Config {
            component,
            message: message.into(),
        }
    }

    pub(crate) fn storage(component: &'static str) -> impl FnOnce(CacheError) -> Self {
        move |source| SessionError::Storage { component, source }
    }

    pub(crate) fn serialization(component: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| SessionError::Serialization { component, source }
    }

    pub(crate) fn transport(component: &'static str) -> impl FnOnce(TransportError) -> Self {
        move |source| SessionError::Transport { component, source }
    }
}

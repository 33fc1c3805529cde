//! Error types for session operations.

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that can occur when driving a positioning session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A positioning operation was requested before consent was granted.
    #[error("location consent has not been granted; call init_consent first")]
    ConsentRequired,

    /// The provider failed while constructing, configuring or starting
    /// a client. The session is back in the idle state.
    #[error("session configuration failed: {0}")]
    Configuration(#[source] ProviderError),

    /// The session task is gone, which only happens once the owning
    /// bridge has been torn down.
    #[error("session task terminated")]
    Terminated,
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consent_required_display() {
        let error = SessionError::ConsentRequired;
        assert_eq!(
            error.to_string(),
            "location consent has not been granted; call init_consent first"
        );
    }

    #[test]
    fn configuration_display_includes_provider_error() {
        let error =
            SessionError::Configuration(ProviderError::Start("service unavailable".to_string()));
        assert_eq!(
            error.to_string(),
            "session configuration failed: failed to start positioning: service unavailable"
        );
    }

    #[test]
    fn terminated_display() {
        let error = SessionError::Terminated;
        assert_eq!(error.to_string(), "session task terminated");
    }

    #[test]
    fn error_debug_format() {
        let error = SessionError::ConsentRequired;
        let debug_str = format!("{error:?}");
        assert!(debug_str.contains("ConsentRequired"));
    }
}

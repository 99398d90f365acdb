//! Error types for gateway operations.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while resolving or invoking SDK capabilities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// A required type or member could not be resolved.
    ///
    /// Fatal: signals an incompatible SDK version, never retried.
    #[error("could not resolve required capability: {name}")]
    Resolution {
        /// Qualified name of the missing type or member.
        name: String,
    },

    /// An invocation failed; the original cause is preserved.
    #[error("invocation of {member} failed: {message}")]
    Invocation {
        /// Name of the invoked member.
        member: String,
        /// Message of the underlying failure.
        message: String,
    },

    /// A wrapped outcome reported failure.
    #[error("operation reported failure: {}", messages.join("; "))]
    Outcome {
        /// Failure messages carried by the outcome object.
        messages: Vec<String>,
    },

    /// A normalized value did not convert to the requested type.
    #[error("unexpected result shape: expected {expected}")]
    Conversion {
        /// The expected value shape.
        expected: &'static str,
    },
}

impl GatewayError {
    /// Creates a resolution error for a missing capability.
    pub fn resolution(name: impl Into<String>) -> Self {
        Self::Resolution { name: name.into() }
    }

    /// Creates an invocation error preserving the underlying cause.
    pub fn invocation(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            member: member.into(),
            message: message.into(),
        }
    }

    /// Creates an outcome-failure error.
    pub fn outcome(messages: Vec<String>) -> Self {
        Self::Outcome { messages }
    }

    /// Returns true if this error signals an incompatible SDK.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, GatewayError::Resolution { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_preserves_cause() {
        let err = GatewayError::invocation("CreateExchange", "socket closed");
        assert!(err.to_string().contains("CreateExchange"));
        assert!(err.to_string().contains("socket closed"));
    }

    #[test]
    fn outcome_joins_messages() {
        let err = GatewayError::outcome(vec!["first".into(), "second".into()]);
        assert_eq!(
            err.to_string(),
            "operation reported failure: first; second"
        );
    }

    #[test]
    fn only_resolution_is_fatal() {
        assert!(GatewayError::resolution("Missing.Type").is_fatal());
        assert!(!GatewayError::invocation("M", "boom").is_fatal());
    }
}

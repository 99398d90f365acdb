//! Credential acquisition seam.

use crate::error::{SyncError, SyncResult};

/// A bearer credential for the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The bearer token.
    pub bearer: String,
}

impl Credential {
    /// Creates a credential from a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer: token.into(),
        }
    }
}

/// Supplies a fresh bearer credential on demand.
///
/// The engine requests one credential per run and never caches or refreshes
/// credentials itself.
pub trait CredentialSource: Send + Sync {
    /// Acquires a fresh credential.
    fn acquire(&self) -> SyncResult<Credential>;
}

/// A credential source that always hands out the same token.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    /// Creates a source for a fixed token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialSource for StaticCredentials {
    fn acquire(&self) -> SyncResult<Credential> {
        if self.token.is_empty() {
            return Err(SyncError::Credential("empty bearer token".into()));
        }
        Ok(Credential::bearer(self.token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_hands_out_token() {
        let source = StaticCredentials::new("tok-123");
        assert_eq!(source.acquire().unwrap(), Credential::bearer("tok-123"));
    }

    #[test]
    fn empty_token_is_an_error() {
        let source = StaticCredentials::new("");
        assert!(matches!(
            source.acquire(),
            Err(SyncError::Credential(_))
        ));
    }
}

//! Signed-in principal
//!
//! The identity provider itself is outside the crate. What the studio needs
//! is the principal it produced, kept in the same key-value surface as the
//! histories, and a gate that refuses tool access without one.

use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use crate::types::StorageKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Key the principal is stored under
pub const AUTH_KEY: &str = "auth-user";

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub display_name: Option<String>,
    pub email: String,
    pub photo_url: Option<String>,
}

impl Principal {
    /// Display name, or "User" when the provider gave none
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("User")
    }
}

/// Persisted sign-in state
pub struct Identity {
    storage: Arc<dyn KeyValueStore>,
    key: StorageKey,
}

impl Identity {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            key: StorageKey::from_static(AUTH_KEY),
        }
    }

    /// Record `principal` as the signed-in user
    pub fn sign_in(&self, principal: &Principal) -> Result<()> {
        if principal.email.trim().is_empty() || !principal.email.contains('@') {
            return Err(Error::invalid_arguments(format!(
                "invalid email address: {:?}",
                principal.email
            )));
        }
        let serialized = serde_json::to_string(principal)?;
        self.storage.set(&self.key, &serialized)?;
        info!(email = %principal.email, "signed in");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        self.storage.delete(&self.key)?;
        info!("signed out");
        Ok(())
    }

    /// The signed-in principal, if any
    ///
    /// Unreadable state counts as signed out.
    pub fn current(&self) -> Option<Principal> {
        match self.storage.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(principal) => Some(principal),
                Err(e) => {
                    warn!(error = %e, "ignoring malformed sign-in state");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read sign-in state");
                None
            }
        }
    }

    /// The signed-in principal, or `Error::NotSignedIn`
    pub fn require(&self) -> Result<Principal> {
        self.current().ok_or(Error::NotSignedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn principal() -> Principal {
        Principal {
            display_name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            photo_url: None,
        }
    }

    #[test]
    fn test_sign_in_and_out() {
        let identity = Identity::new(Arc::new(MemoryStore::new()));
        assert!(identity.current().is_none());
        assert!(matches!(identity.require(), Err(Error::NotSignedIn)));

        identity.sign_in(&principal()).unwrap();
        assert_eq!(identity.require().unwrap(), principal());

        identity.sign_out().unwrap();
        assert!(identity.current().is_none());
    }

    #[test]
    fn test_rejects_invalid_email() {
        let identity = Identity::new(Arc::new(MemoryStore::new()));
        let mut p = principal();
        p.email = "nobody".to_string();
        assert!(identity.sign_in(&p).is_err());
        assert!(identity.current().is_none());
    }

    #[test]
    fn test_malformed_state_is_signed_out() {
        let storage = Arc::new(MemoryStore::new());
        storage
            .set(&StorageKey::new(AUTH_KEY).unwrap(), "garbage")
            .unwrap();
        let identity = Identity::new(storage);
        assert!(identity.current().is_none());
    }

    #[test]
    fn test_default_display_name() {
        let mut p = principal();
        p.display_name = None;
        assert_eq!(p.name(), "User");
    }
}

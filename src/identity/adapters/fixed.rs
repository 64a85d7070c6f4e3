//! Identity provider backed by a fixed, swappable session value.

use std::sync::{Arc, RwLock};

use crate::identity::{domain::OwnerId, ports::IdentityProvider};

/// Identity provider holding a single session that can be signed in or out.
///
/// Used by embedders that resolve the identity elsewhere and by tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    current: Arc<RwLock<Option<OwnerId>>>,
}

impl StaticIdentity {
    /// Creates a provider with an active session for `owner`.
    #[must_use]
    pub fn signed_in(owner: OwnerId) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(owner))),
        }
    }

    /// Creates a provider with no active session.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Replaces the active session.
    pub fn sign_in(&self, owner: OwnerId) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = Some(owner);
    }

    /// Ends the active session.
    pub fn sign_out(&self) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = None;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<OwnerId> {
        self.current
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

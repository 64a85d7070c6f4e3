//! Identity provider port.

use crate::identity::domain::OwnerId;

/// Supplies the identifier of the user with an active session.
///
/// Implementations answer synchronously once a session is established.
/// `None` means nobody is signed in.
pub trait IdentityProvider: Send + Sync {
    /// Returns the current user's identifier, if any.
    fn current_user_id(&self) -> Option<OwnerId>;
}

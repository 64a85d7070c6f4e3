//! Domain types shared by every context that keys records by owner.

mod owner;

pub use owner::{IdentityDomainError, OwnerId};

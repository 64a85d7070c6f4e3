//! Port contracts for the identity boundary.

pub mod provider;

pub use provider::IdentityProvider;

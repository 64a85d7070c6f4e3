//! Identity adapters.

mod fixed;

pub use fixed::StaticIdentity;

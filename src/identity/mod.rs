//! Identity boundary for FocusQuest.
//!
//! Sessions and credentials live with an external identity provider. This
//! module only models what the engine needs from it: a stable owner
//! identifier, and a port for asking who is currently signed in.

pub mod adapters;
pub mod domain;
pub mod ports;

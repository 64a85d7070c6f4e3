//! Step definitions for quest reward scenarios.

pub mod world;

mod given;
mod then;
mod when;

//! Adapter implementations for task ports.

pub mod file;
pub mod memory;
pub mod postgres;

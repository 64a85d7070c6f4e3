//! In-memory progression adapter.

mod progression;

pub use progression::InMemoryProgressionRepository;

//! Local JSON file progression adapter.

mod progression;

pub use progression::FileProgressionRepository;

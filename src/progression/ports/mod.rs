//! Port contracts for progression persistence.

pub mod repository;

pub use repository::{
    ProgressionRepository, ProgressionRepositoryError, ProgressionRepositoryResult,
};

//! Application services for progression.

mod progression;

pub use progression::{
    ProgressionService, ProgressionServiceError, ProgressionServiceResult, XpAward,
};

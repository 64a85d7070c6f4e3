//! Local JSON file task adapter.

mod task;

pub use task::FileTaskRepository;

//! Local persistent storage shared by the file adapters.
//!
//! The task and progression file adapters keep one JSON document per owner
//! and collection inside a single capability-scoped directory.

mod document;

pub use document::{DocumentStoreError, JsonDocumentStore, document_name};

//! Unit tests for the task lifecycle.

mod service_tests;

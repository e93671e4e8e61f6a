//! Integration test runner for unit tests
//! This file makes cargo test discover the unit test modules

#[path = "unit/test_diagnostic.rs"]
mod test_diagnostic;

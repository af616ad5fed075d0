//! Shared test utilities for pobj crates
//!
//! - [`mocks`]: mockall doubles for the capability traits
//! - [`fixtures`]: small in-memory solutions built from source strings

pub mod fixtures;
pub mod mocks;

pub use fixtures::{BuiltFixture, SolutionFixture, ORDER_SERVICE};
pub use mocks::{mock_semantic_analyzer, MockSemanticAnalyzer};

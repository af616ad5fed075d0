//! Language-agnostic declaration model
//!
//! Backends parse source into these types and print them back out; the
//! refactoring pipeline only ever works on this model, never on raw text.

pub mod declaration;

pub use declaration::*;

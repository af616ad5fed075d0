//! Extract Parameter Object
//!
//! Turns a method's parameter list into a new type with one property per
//! parameter, adds it to the project as a new compilation unit and removes
//! the imports the new unit does not need.
//!
//! # Stages
//!
//! - [`synthesizer`]: parameter list → type declaration (pure)
//! - [`mutator`]: new unit → new solution snapshot
//! - [`pruner`]: diagnostics → removed import directives
//! - [`provider`]: action offering and the pipeline tying the stages together
//! - [`signature`]: follow-up rewrite of the method signature and call sites,
//!   run separately by the host

pub mod mutator;
pub mod provider;
pub mod pruner;
pub mod signature;
pub mod synthesizer;

pub use mutator::{add_unit, resolve_class_name, unit_file_name};
pub use provider::{
    classifier_from_config, CodeAction, ExtractOutcome, ExtractParameterObjectProvider,
    ACTION_TITLE,
};
pub use pruner::{prune, PruneOutcome, PruneStatus};
pub use signature::{object_initializer, rewrite_signature, SignatureRewrite};
pub use synthesizer::synthesize;

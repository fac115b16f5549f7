//! # graphql-util test utilities
//!
//! Shared test infrastructure for the graphql-util crates.
//!
//! ## Modules
//!
//! - [`fixtures`] - Introspection fixture and matching documents
//! - [`project`] - Scratch target directories
//! - [`tracking`] - Scripted transport with request tracking

// Test utilities are less strict than production code
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::expect_used)]

pub mod fixtures;
pub mod project;
pub mod tracking;

pub use project::TestProject;
pub use tracking::MockTransport;

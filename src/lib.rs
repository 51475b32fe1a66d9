//! # Mutation Audit
//!
//! A structural isomorphism auditor for code mutation corpora.
//!
//! Given code snippets in multiple languages, this library parses each one
//! into a concrete syntax tree, filters out trivial or degenerate samples,
//! applies an ordered sequence of mutation rules to a clone of the tree, and
//! verifies that the mutated tree is structurally isomorphic to the original
//! except at the locations a per-sample manifest explicitly permits.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mutation_audit::manifest::ManifestSet;
//! use mutation_audit::pipeline::run_audit;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = run_audit(
//!         Path::new("corpus.jsonl"),
//!         &["rename-identifier".to_string()],
//!         &ManifestSet::default(),
//!         Path::new("summary_log.csv"),
//!         None, // JSON run report
//!         0,    // worker threads, 0 = one per core
//!     )?;
//!
//!     println!("{} samples verified", report.verified);
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod corpus;
pub mod error;
pub mod filter;
pub mod manifest;
pub mod mutation;
pub mod node;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod verify;

pub use error::{AuditError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{AuditError, Result};
    pub use crate::filter::DiscardReason;
    pub use crate::manifest::{Manifest, ManifestSet};
    pub use crate::mutation::MutationEngine;
    pub use crate::node::Node;
    pub use crate::pipeline::run_audit;
    pub use crate::verify::{verify, Mismatch, VerifyReport};
}

//! Porter library.
//!
//! This crate provides the core functionality for recursively installing
//! porter packages: fetching tagged repositories, validating manifests and
//! runtime compatibility, wrapping source files in namespace scopes derived
//! from the dependency chain, and placing them under a local `porter/`
//! directory. It is used by the `porter` CLI binary and can be consumed
//! programmatically for testing or custom install workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`context`] - Ancestor package chain and staging-key encoding
//! - [`error`] - Semantic error types
//! - [`fetch`] - Repository fetching with a bounded wait
//! - [`manifest`] - `porter.json` model and loading
//! - [`output`] - Progress output helpers
//! - [`reference`] - Package reference tokenizer and duplicate detection
//! - [`resolver`] - Recursive resolution and per-package installation
//! - [`runtime`] - Runtime compatibility checks
//! - [`scanner`] - Source file enumeration and filtering
//! - [`workspace`] - Per-run work directory and staging paths
//! - [`wrapper`] - Namespace wrapping transform

pub mod cli;
pub mod context;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod output;
pub mod reference;
pub mod resolver;
pub mod runtime;
pub mod scanner;
pub mod workspace;
pub mod wrapper;

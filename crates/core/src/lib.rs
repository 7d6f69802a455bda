//! Skaff Core Library
//!
//! This is the core library for the skaff scaffolding tool. It provides the
//! task orchestration, the scaffold pipeline, and every collaborator the CLI
//! wires together.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`scaffold`] - The scaffold pipeline: builds and runs the task graph
//! - [`orchestrator`] - Explicit task graph + eligibility-driven scheduler
//! - [`command`] - Argument-array subprocess execution
//! - [`registry`] - Package registry availability probe
//! - [`tree`] - Placeholder rewriting and script permissions on the cloned tree
//! - [`project`] - Target path resolution and name validation
//! - [`prompt`] - Interactive confirmation
//! - [`config`] - `skaff.yml` parsing and defaults
//! - [`logger`] - Leveled colored terminal output
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! The primary entry point is the [`Scaffolder`]:
//!
//! ```rust,no_run
//! use skaff_core::config::SkaffConfig;
//! use skaff_core::project::ProjectTarget;
//! use skaff_core::{Scaffolder, ScaffoldOptions};
//! use std::path::Path;
//!
//! # async fn example() -> skaff_core::types::SkaffResult<()> {
//! let target = ProjectTarget::resolve(Path::new("/work"), "my-lib")?;
//! let scaffolder = Scaffolder::new(
//!     SkaffConfig::default(),
//!     target,
//!     ScaffoldOptions::default(),
//! );
//! scaffolder.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod logger;
pub mod orchestrator;
pub mod project;
pub mod prompt;
pub mod registry;
pub mod scaffold;
pub mod tree;
pub mod types;

// Re-export the main types for easier usage
pub use scaffold::{ScaffoldOptions, Scaffolder};
pub use types::{SkaffError, SkaffResult};

//! buildplan - layered build configuration resolver.
//!
//! buildplan turns a project's `buildplan*.yml` files and environment into
//! one validated, immutable build plan for a front-end bundler: output
//! paths, import aliases, injected style resources, dev-server proxy rules
//! and the development or production optimization policy.
//!
//! # Modules
//!
//! - [`aliases`] - Path alias table
//! - [`assembler`] - Build plan assembly and cross-field invariants
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, layering, and validation
//! - [`env`] - Captured process environment
//! - [`error`] - Error types and result aliases
//! - [`mode`] - Build mode detection and resolution
//! - [`policy`] - Mode-conditional optimization policy
//! - [`proxy`] - Dev-server proxy rules
//! - [`resolve`] - End-to-end resolution pipeline
//! - [`styles`] - Shared style resources
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use buildplan::mode::BuildMode;
//! use buildplan::policy::select_policy;
//!
//! let policy = select_policy(BuildMode::Development);
//! assert!(policy.source_map);
//! assert!(!policy.minify);
//! ```
//!
//! For file-based resolution, see [`resolve::resolve_build_plan`] and the
//! integration tests.

pub mod aliases;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod mode;
pub mod policy;
pub mod proxy;
pub mod resolve;
pub mod styles;
pub mod ui;

pub use assembler::ResolvedConfig;
pub use env::EnvSnapshot;
pub use error::{ConfigError, EnvironmentError, Result};
pub use resolve::{resolve_build_plan, ResolveOptions};

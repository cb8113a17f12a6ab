//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`buildplan resolve`, `buildplan check`)
//! - Shared project root and resolve options
//! - Consistent global flag handling

pub mod aliases;
pub mod check;
pub mod completions;
pub mod dispatcher;
pub mod init;
pub mod policy;
pub mod proxy;
pub mod resolve;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

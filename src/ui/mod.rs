//! Terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] writing plans to stdout and diagnostics to stderr
//! - [`MockUI`] capturing everything for tests
//!
//! # Example
//!
//! ```
//! use buildplan::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("Build plan");
//! ui.key_value("mode", "production");
//! assert!(ui.has_key_value("mode", "production"));
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, PlanTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Change the output mode.
    fn set_output_mode(&mut self, mode: OutputMode);

    /// Write machine-readable output. Never suppressed.
    fn output(&mut self, data: &str);

    /// Display an informational message.
    fn message(&mut self, msg: &str);

    /// Display a message only in verbose mode.
    fn verbose(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message. Never suppressed.
    fn error(&mut self, msg: &str);

    /// Show a section header.
    fn show_header(&mut self, title: &str);

    /// Show a labelled value.
    fn key_value(&mut self, key: &str, value: &str);
}

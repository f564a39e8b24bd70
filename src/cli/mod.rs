//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, config management
//! and the consultation runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_consultation, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, ConsultOptions};
pub use presenter::Presenter;

//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `validate` | Check plugin folders against the definition format |
//! | `lint` | Check end-to-end tests for required boilerplate patterns |
//! | `new` | Scaffold a plugin folder |
//! | `list` | Overview of the catalog |
//!
//! All commands support `--format text|json`; `--verbose` prints debug
//! diagnostics on stderr; `--dir` points at a catalog other than the
//! current directory. Call [`run()`] to parse arguments and execute.

mod app;
mod lint_cmd;
mod list_cmd;
mod new_cmd;
mod output;
mod validate_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};

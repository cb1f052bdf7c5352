//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod output;
#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use output::{write_archive, write_files};
#[cfg(feature = "tui")]
pub use prompts::{init, preview, run, validate, GenerateArgs};

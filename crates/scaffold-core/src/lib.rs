//! Scaffold Core - generation engine for Serverless Framework projects
//!
//! Turns a project configuration (functions, their triggers, and optional
//! extensions) into a ready-to-run project skeleton packaged as one zip archive:
//! `serverless.yml`, `package.json`, one handler stub per function, and any
//! extension config files.
//!
//! # Architecture
//!
//! The engine is a pure, synchronous pipeline. Each stage is its own module:
//!
//! - **config** - The validated `ProjectConfig` model and the project file form
//! - **triggers** - Trigger resolution into descriptor events, and previews
//! - **extensions** - Extension conflict checks and manifest fragments
//! - **manifest** - Descriptor and dependency manifest synthesis
//! - **templates** - Embedded templates and the file tree builder
//! - **archive** - Deterministic zip packaging
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based command front end
//!
//! # Example Usage
//!
//! ```ignore
//! use scaffold_core::config::{FunctionSpec, HttpMethod, ProjectConfig, TriggerSpec};
//!
//! let config = ProjectConfig::new("hello-world").with_function(
//!     FunctionSpec::new("hello-world")
//!         .with_trigger(TriggerSpec::http(HttpMethod::Get, "/hello-world")),
//! );
//! let zip_bytes = scaffold_core::generate(&config)?;
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod extensions;
pub mod generator;
pub mod manifest;
pub mod templates;
pub mod triggers;

#[cfg(feature = "tui")]
pub mod tui;

use config::TriggerSpec;

// Re-export main types for convenience
pub use config::{load_project, FunctionSpec, HttpMethod, ProjectConfig, ProjectFile};
pub use error::{GenerationError, Result};
pub use extensions::ExtensionId;
pub use generator::{
    generate, generate_files, generate_files_with_limits, generate_with_limits, GenerationLimits,
};
pub use templates::GeneratedFile;

#[cfg(feature = "tui")]
pub use tui::run;

/// Engine version - used for project file compatibility checking
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Summary of a trigger list for live display while a form is being edited
pub fn preview_triggers(triggers: &[TriggerSpec]) -> String {
    triggers::summarize(triggers)
}

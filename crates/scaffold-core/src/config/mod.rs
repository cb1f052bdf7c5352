//! Project configuration: the validated model and its file form

pub mod input;
pub mod model;
pub mod version;

use crate::error::Result;
use std::path::Path;

pub use input::{FileFormat, FunctionInput, ProjectFile, TriggerInput};
pub use model::{FunctionId, FunctionSpec, HttpMethod, ProjectConfig, TriggerSpec};
pub use version::check_compatibility;

/// A project file loaded into a configuration, with any version warning
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub config: ProjectConfig,
    pub version_warning: Option<String>,
}

/// Load a project file and resolve it into a configuration
pub fn load_project(path: &Path) -> Result<LoadedProject> {
    let file = ProjectFile::load(path)?;
    let version_warning = file
        .scaffold_version
        .as_deref()
        .and_then(|v| check_compatibility(crate::ENGINE_VERSION, v));
    if let Some(warning) = &version_warning {
        tracing::warn!(path = %path.display(), "{}", warning);
    }
    Ok(LoadedProject {
        config: file.into_config()?,
        version_warning,
    })
}

//! Manifest synthesis
//!
//! Merges the descriptor skeleton, every function's resolved triggers, and the
//! composed extension fragment into one deployment descriptor and one
//! dependency manifest. Output depends only on the configuration value.

pub mod dependencies;
pub mod descriptor;

use crate::config::ProjectConfig;
use crate::error::{GenerationError, Result};
use crate::extensions::{self, ExtensionId};
use crate::templates::GeneratedFile;
use crate::triggers;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

pub use dependencies::{DependencyManifest, DEPENDENCY_MANIFEST_PATH};
pub use descriptor::{
    DeploymentDescriptor, FunctionDeclaration, Iam, IamRole, Resources, DESCRIPTOR_PATH,
};

/// Everything the file tree builder needs besides the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub descriptor: DeploymentDescriptor,
    pub dependencies: DependencyManifest,
    /// Extensions in effect: the selected ones plus any a trigger requires
    pub extensions: BTreeSet<ExtensionId>,
    /// Extension files, in canonical extension order
    pub auxiliary_files: Vec<GeneratedFile>,
}

pub fn synthesize(config: &ProjectConfig) -> Result<Synthesis> {
    let mut descriptor = DeploymentDescriptor::skeleton(&config.name);
    let mut effective = config.extensions.clone();
    let mut seen_keys: HashMap<String, &str> = HashMap::new();

    for function in &config.functions {
        let key = function.descriptor_key();
        if let Some(first) = seen_keys.insert(key.clone(), &function.name) {
            return Err(GenerationError::DuplicateOutputPath {
                path: format!("functions.{}", key),
                first: first.to_string(),
                second: function.name.clone(),
            });
        }

        let mut events = Vec::with_capacity(function.triggers.len());
        for trigger in &function.triggers {
            let resolved = triggers::resolve(trigger, &function.name);
            effective.extend(resolved.required_extensions);
            events.push(resolved.declaration);
        }

        debug!(function = %function.name, events = events.len(), "declared function");
        descriptor.functions.push(FunctionDeclaration {
            key,
            handler: function.handler_reference(),
            events,
        });
    }

    let fragment = extensions::compose(&effective, config)?;

    for plugin in &fragment.plugins {
        if !descriptor.plugins.iter().any(|p| p == plugin) {
            descriptor.plugins.push(plugin.to_string());
        }
    }
    descriptor.provider.environment = fragment.environment;
    if !fragment.iam_statements.is_empty() {
        descriptor.provider.iam = Some(Iam {
            role: IamRole {
                statements: fragment.iam_statements,
            },
        });
    }
    descriptor.custom = fragment.custom;
    if !fragment.resources.is_empty() {
        descriptor.resources = Some(Resources {
            resources: fragment.resources,
        });
    }

    let mut dependencies = DependencyManifest::base(&config.name);
    dependencies.add_dependencies(&fragment.dependencies);
    dependencies.add_dev_dependencies(&fragment.dev_dependencies);
    dependencies.add_scripts(&fragment.scripts);

    Ok(Synthesis {
        descriptor,
        dependencies,
        extensions: effective,
        auxiliary_files: fragment.auxiliary_files,
    })
}

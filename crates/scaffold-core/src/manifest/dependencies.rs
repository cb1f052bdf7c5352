//! Dependency manifest (`package.json`)

use crate::error::Result;
use crate::extensions::Dependency;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEPENDENCY_MANIFEST_PATH: &str = "package.json";

pub const PACKAGE_VERSION: &str = "1.0.0";

/// Dependencies every generated project has
pub const BASE_DEV_DEPENDENCIES: &[Dependency] = &[Dependency {
    name: "serverless",
    version: "^3.38.0",
}];

pub const BASE_SCRIPTS: &[(&str, &str)] = &[("deploy", "serverless deploy")];

/// Package tables are maps keyed by name, so they come out de-duplicated and
/// sorted whatever order entries were added in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyManifest {
    pub name: String,
    pub version: String,
    pub private: bool,
    pub scripts: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl DependencyManifest {
    /// Manifest with only the base scripts and dependencies
    pub fn base(name: &str) -> Self {
        let mut manifest = Self {
            name: name.to_string(),
            version: PACKAGE_VERSION.to_string(),
            private: true,
            scripts: BTreeMap::new(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
        };
        manifest.add_scripts(BASE_SCRIPTS);
        manifest.add_dev_dependencies(BASE_DEV_DEPENDENCIES);
        manifest
    }

    /// First entry for a name wins
    pub fn add_dependencies(&mut self, deps: &[Dependency]) {
        insert_all(&mut self.dependencies, deps);
    }

    pub fn add_dev_dependencies(&mut self, deps: &[Dependency]) {
        insert_all(&mut self.dev_dependencies, deps);
    }

    pub fn add_scripts(&mut self, scripts: &[(&str, &str)]) {
        for (name, command) in scripts {
            self.scripts
                .entry(name.to_string())
                .or_insert_with(|| command.to_string());
        }
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)? + "\n")
    }
}

fn insert_all(table: &mut BTreeMap<String, String>, deps: &[Dependency]) {
    for dep in deps {
        table
            .entry(dep.name.to_string())
            .or_insert_with(|| dep.version.to_string());
    }
}

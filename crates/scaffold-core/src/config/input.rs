//! Project file parsing
//!
//! A project file is the serialized form of the export form. Tags are read as
//! plain strings and only then resolved into the closed trigger and extension
//! enums, so an unknown tag is reported with the function and trigger index it
//! came from. Display-only state (such as a `collapsed` flag) and fields of
//! other trigger variants are accepted and ignored.

use super::model::{FunctionId, FunctionSpec, HttpMethod, ProjectConfig, TriggerSpec};
use crate::error::{GenerationError, Result};
use crate::extensions::ExtensionId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialization format of a project file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    /// Pick a format from the file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }
}

/// Root of a project file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    /// Engine version the file was written for (semver)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaffold_version: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<String>,

    #[serde(default, alias = "sentryDsn", skip_serializing_if = "Option::is_none")]
    pub telemetry_dsn: Option<String>,

    #[serde(default)]
    pub functions: Vec<FunctionInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub triggers: Vec<TriggerInput>,
}

/// A trigger as the trigger editor stores it: a tag plus every parameter
/// field any variant may use
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerInput {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cron: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
}

impl TriggerInput {
    /// Resolve the tag into a trigger variant, keeping only that variant's field
    pub fn into_trigger(self, function: &str, index: usize) -> Result<TriggerSpec> {
        let http = |method| TriggerSpec::Http {
            method,
            path: self.path.clone(),
        };
        let trigger = match self.kind.as_str() {
            "httpAny" => http(HttpMethod::Any),
            "httpGet" => http(HttpMethod::Get),
            "httpPost" => http(HttpMethod::Post),
            "httpPut" => http(HttpMethod::Put),
            "httpDelete" => http(HttpMethod::Delete),
            "scheduleRate" => TriggerSpec::ScheduleRate { rate: self.rate },
            "scheduleCron" => TriggerSpec::ScheduleCron { cron: self.cron },
            "eventBridgeSource" => TriggerSpec::EventBridgeSource {
                source: self.source,
            },
            "eventBridgeBus" => TriggerSpec::EventBridgeBus { bus: self.bus },
            "s3ObjectCreated" => TriggerSpec::S3ObjectCreated {
                bucket: self.bucket,
            },
            _ => {
                return Err(GenerationError::UnknownTriggerType {
                    function: function.to_string(),
                    index,
                    tag: self.kind.clone(),
                })
            }
        };
        Ok(trigger)
    }
}

impl ProjectFile {
    /// The form's initial state: one `hello-world` function answering
    /// `GET /hello-world`, with unit tests and webpack enabled
    pub fn starter(name: impl Into<String>) -> Self {
        Self {
            scaffold_version: Some(crate::ENGINE_VERSION.to_string()),
            name: name.into(),
            extensions: vec![
                ExtensionId::UnitTests.id().to_string(),
                ExtensionId::BundlerWebpack.id().to_string(),
            ],
            functions: vec![FunctionInput {
                id: None,
                name: "hello-world".to_string(),
                triggers: vec![TriggerInput {
                    kind: "httpGet".to_string(),
                    path: Some("/hello-world".to_string()),
                    ..Default::default()
                }],
            }],
            ..Default::default()
        }
    }

    /// Serialize in the given format
    pub fn render(&self, format: FileFormat) -> Result<String> {
        match format {
            FileFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            FileFormat::Json => Ok(serde_json::to_string_pretty(self)? + "\n"),
        }
    }

    /// Parse a project file in the given format
    pub fn parse(content: &str, format: FileFormat) -> Result<Self> {
        match format {
            FileFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| GenerationError::ProjectFile(e.to_string())),
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| GenerationError::ProjectFile(e.to_string())),
        }
    }

    /// Read and parse a project file, choosing the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, FileFormat::from_path(path))
    }

    /// Resolve tags and build the configuration snapshot.
    ///
    /// Name patterns are not checked here; see [`ProjectConfig::validate`].
    pub fn into_config(self) -> Result<ProjectConfig> {
        let mut config = ProjectConfig::new(self.name);

        for id in &self.extensions {
            let extension = ExtensionId::parse(id).ok_or_else(|| {
                GenerationError::invalid_config(format!("Unknown extension '{}'", id))
            })?;
            config.extensions.insert(extension);
        }

        config.domain = self.domain;
        config.cert = self.cert;
        config.telemetry_dsn = self.telemetry_dsn;

        for (position, function) in self.functions.into_iter().enumerate() {
            let triggers = function
                .triggers
                .into_iter()
                .enumerate()
                .map(|(index, trigger)| trigger.into_trigger(&function.name, index))
                .collect::<Result<Vec<_>>>()?;

            let id = function
                .id
                .unwrap_or_else(|| format!("function-{}", position));
            config.functions.push(FunctionSpec {
                id: FunctionId::new(id),
                name: function.name,
                triggers,
            });
        }

        Ok(config)
    }
}

//! Validated project configuration
//!
//! A `ProjectConfig` is the immutable snapshot of user intent handed to the
//! engine at export time. It owns its functions, each function owns its
//! triggers; there is no sharing between records.

use crate::error::{GenerationError, Result};
use crate::extensions::ExtensionId;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

/// Allowed project names: word characters and dashes, 2 to 36 long
const PROJECT_NAME_PATTERN: &str = r"^[A-Za-z0-9_-]{2,36}$";

/// Allowed function names: like project names, plus `/` for nesting
const FUNCTION_NAME_PATTERN: &str = r"^[A-Za-z0-9_/-]{2,36}$";

/// HTTP method bound by an HTTP trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Any,
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Method name as written into the deployment descriptor
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Any => "ANY",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared event source that invokes a function.
///
/// Parameters are optional: defaults are applied by the resolver, so a sparse
/// trigger is a complete description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerSpec {
    Http {
        method: HttpMethod,
        path: Option<String>,
    },
    ScheduleRate {
        rate: Option<String>,
    },
    ScheduleCron {
        cron: Option<String>,
    },
    EventBridgeSource {
        source: Option<String>,
    },
    EventBridgeBus {
        bus: Option<String>,
    },
    S3ObjectCreated {
        bucket: Option<String>,
    },
}

impl TriggerSpec {
    /// Every trigger tag accepted in project files
    pub const TAGS: [&'static str; 10] = [
        "httpAny",
        "httpGet",
        "httpPost",
        "httpPut",
        "httpDelete",
        "scheduleRate",
        "scheduleCron",
        "eventBridgeSource",
        "eventBridgeBus",
        "s3ObjectCreated",
    ];

    pub fn http(method: HttpMethod, path: impl Into<String>) -> Self {
        TriggerSpec::Http {
            method,
            path: Some(path.into()),
        }
    }

    /// The tag this trigger is written as in project files
    pub fn tag(&self) -> &'static str {
        match self {
            TriggerSpec::Http { method, .. } => match method {
                HttpMethod::Any => "httpAny",
                HttpMethod::Get => "httpGet",
                HttpMethod::Post => "httpPost",
                HttpMethod::Put => "httpPut",
                HttpMethod::Delete => "httpDelete",
            },
            TriggerSpec::ScheduleRate { .. } => "scheduleRate",
            TriggerSpec::ScheduleCron { .. } => "scheduleCron",
            TriggerSpec::EventBridgeSource { .. } => "eventBridgeSource",
            TriggerSpec::EventBridgeBus { .. } => "eventBridgeBus",
            TriggerSpec::S3ObjectCreated { .. } => "s3ObjectCreated",
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self, TriggerSpec::Http { .. })
    }
}

/// Opaque identity of a function record. Never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionId(String);

impl FunctionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub id: FunctionId,
    pub name: String,
    pub triggers: Vec<TriggerSpec>,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: FunctionId::new(name.clone()),
            name,
            triggers: Vec::new(),
        }
    }

    pub fn with_trigger(mut self, trigger: TriggerSpec) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Archive path of this function's handler stub
    pub fn handler_path(&self) -> String {
        format!("handlers/{}.js", self.name)
    }

    /// Handler reference written into the deployment descriptor
    pub fn handler_reference(&self) -> String {
        format!("handlers/{}.handler", self.name)
    }

    /// Key of this function in the descriptor's `functions` block
    pub fn descriptor_key(&self) -> String {
        self.name.replace('/', "-")
    }

    /// Whether the handler stub should answer HTTP requests
    pub fn is_http(&self) -> bool {
        self.triggers.iter().any(TriggerSpec::is_http)
    }
}

/// Root of the configuration model
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub extensions: BTreeSet<ExtensionId>,
    /// Used only with the custom domain extension
    pub domain: Option<String>,
    /// Used only with the custom domain extension
    pub cert: Option<String>,
    /// Used only with the telemetry extension
    pub telemetry_dsn: Option<String>,
    pub functions: Vec<FunctionSpec>,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_extension(mut self, extension: ExtensionId) -> Self {
        self.extensions.insert(extension);
        self
    }

    pub fn with_function(mut self, function: FunctionSpec) -> Self {
        self.functions.push(function);
        self
    }

    pub fn has_extension(&self, extension: ExtensionId) -> bool {
        self.extensions.contains(&extension)
    }

    /// Check the name patterns of the project and every function.
    ///
    /// Extension-specific fields are checked by the extension composer.
    pub fn validate(&self) -> Result<()> {
        let project_pattern = Regex::new(PROJECT_NAME_PATTERN)
            .map_err(|e| GenerationError::invalid_config(e.to_string()))?;
        let function_pattern = Regex::new(FUNCTION_NAME_PATTERN)
            .map_err(|e| GenerationError::invalid_config(e.to_string()))?;

        if self.name.is_empty() {
            return Err(GenerationError::invalid_config("Enter a project name."));
        }
        if !project_pattern.is_match(&self.name) {
            return Err(GenerationError::invalid_config(format!(
                "Project name '{}' must be 2-36 letters, digits, '_' or '-'",
                self.name
            )));
        }

        for function in &self.functions {
            if !function_pattern.is_match(&function.name) {
                return Err(GenerationError::invalid_config(format!(
                    "Function name '{}' must be 2-36 letters, digits, '_', '-' or '/'",
                    function.name
                )));
            }
            if function.name.split('/').any(str::is_empty) {
                return Err(GenerationError::invalid_config(format!(
                    "Function name '{}' has an empty path segment",
                    function.name
                )));
            }
        }

        Ok(())
    }
}

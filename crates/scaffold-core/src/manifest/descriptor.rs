//! Deployment descriptor (`serverless.yml`) types
//!
//! Field order of these structs is the key order of the rendered document.

use crate::error::Result;
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};

pub const DESCRIPTOR_PATH: &str = "serverless.yml";

pub const FRAMEWORK_VERSION: &str = "3";
pub const PROVIDER_NAME: &str = "aws";
pub const PROVIDER_RUNTIME: &str = "nodejs18.x";
pub const PROVIDER_REGION: &str = "us-east-1";
pub const PROVIDER_STAGE: &str = "${opt:stage, 'dev'}";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentDescriptor {
    pub service: String,
    pub framework_version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    pub provider: Provider,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub custom: Mapping,
    #[serde(serialize_with = "serialize_functions")]
    pub functions: Vec<FunctionDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provider {
    pub name: String,
    pub runtime: String,
    pub region: String,
    pub stage: String,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub environment: Mapping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam: Option<Iam>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Iam {
    pub role: IamRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IamRole {
    pub statements: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    /// Key in the `functions` block
    #[serde(skip)]
    pub key: String,
    pub handler: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resources {
    #[serde(rename = "Resources")]
    pub resources: Mapping,
}

impl DeploymentDescriptor {
    /// The fixed skeleton every project starts from
    pub fn skeleton(service: &str) -> Self {
        Self {
            service: service.to_string(),
            framework_version: FRAMEWORK_VERSION.to_string(),
            plugins: Vec::new(),
            provider: Provider {
                name: PROVIDER_NAME.to_string(),
                runtime: PROVIDER_RUNTIME.to_string(),
                region: PROVIDER_REGION.to_string(),
                stage: PROVIDER_STAGE.to_string(),
                environment: Mapping::new(),
                iam: None,
            },
            custom: Mapping::new(),
            functions: Vec::new(),
            resources: None,
        }
    }

    pub fn function(&self, key: &str) -> Option<&FunctionDeclaration> {
        self.functions.iter().find(|f| f.key == key)
    }

    pub fn render(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Functions are kept as a list to pin their order, and written as a map
fn serialize_functions<S: Serializer>(
    functions: &[FunctionDeclaration],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(functions.iter().map(|f| (&f.key, f)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_key_order() {
        let yaml = DeploymentDescriptor::skeleton("hello-world").render().unwrap();
        let service = yaml.find("service:").unwrap();
        let framework = yaml.find("frameworkVersion:").unwrap();
        let provider = yaml.find("provider:").unwrap();
        let functions = yaml.find("functions:").unwrap();
        assert!(service < framework && framework < provider && provider < functions);
        assert!(!yaml.contains("plugins:"));
        assert!(!yaml.contains("custom:"));
        assert!(!yaml.contains("resources:"));
        assert!(yaml.contains("runtime: nodejs18.x"));
    }

    #[test]
    fn test_framework_version_stays_a_string() {
        let yaml = DeploymentDescriptor::skeleton("svc").render().unwrap();
        let parsed: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["frameworkVersion"].as_str(), Some("3"));
        assert_eq!(parsed["provider"]["stage"].as_str(), Some("${opt:stage, 'dev'}"));
    }

    #[test]
    fn test_functions_render_in_declaration_order() {
        let mut descriptor = DeploymentDescriptor::skeleton("svc");
        for key in ["zeta", "alpha", "mid"] {
            descriptor.functions.push(FunctionDeclaration {
                key: key.to_string(),
                handler: format!("handlers/{}.handler", key),
                events: Vec::new(),
            });
        }
        let yaml = descriptor.render().unwrap();
        let zeta = yaml.find("zeta:").unwrap();
        let alpha = yaml.find("alpha:").unwrap();
        let mid = yaml.find("mid:").unwrap();
        assert!(zeta < alpha && alpha < mid);
        assert!(descriptor.function("alpha").is_some());
    }
}

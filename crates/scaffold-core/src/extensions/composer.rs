//! Extension composition
//!
//! Turns a set of extensions into one `ManifestFragment`: dependency entries,
//! plugin declarations, descriptor snippets for fixed insertion points, and
//! auxiliary files. Each extension's contribution comes from a fixed table.

use super::ExtensionId;
use crate::config::ProjectConfig;
use crate::error::{GenerationError, Result};
use crate::templates::{self, GeneratedFile};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// Mutually exclusive extension pairs
const CONFLICTS: &[(ExtensionId, ExtensionId)] =
    &[(ExtensionId::BundlerWebpack, ExtensionId::BundlerEsbuild)];

/// A package entry for the dependency manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: &'static str,
    pub version: &'static str,
}

const fn dep(name: &'static str, version: &'static str) -> Dependency {
    Dependency { name, version }
}

/// Merged contribution of all active extensions.
///
/// Every field is an insertion point owned by the synthesizer's skeleton.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestFragment {
    /// `dependencies` in the dependency manifest
    pub dependencies: Vec<Dependency>,
    /// `devDependencies` in the dependency manifest
    pub dev_dependencies: Vec<Dependency>,
    /// `scripts` in the dependency manifest
    pub scripts: Vec<(&'static str, &'static str)>,
    /// Descriptor `plugins` list
    pub plugins: Vec<&'static str>,
    /// Descriptor `provider.environment`
    pub environment: Mapping,
    /// Descriptor `provider.iam.role.statements`
    pub iam_statements: Vec<Value>,
    /// Descriptor `custom` block
    pub custom: Mapping,
    /// Descriptor `resources.Resources`
    pub resources: Mapping,
    /// Extra files, in canonical extension order
    pub auxiliary_files: Vec<GeneratedFile>,
}

impl ManifestFragment {
    fn merge(&mut self, other: ManifestFragment) {
        self.dependencies.extend(other.dependencies);
        self.dev_dependencies.extend(other.dev_dependencies);
        self.scripts.extend(other.scripts);
        self.plugins.extend(other.plugins);
        self.environment.extend(other.environment);
        self.iam_statements.extend(other.iam_statements);
        self.custom.extend(other.custom);
        self.resources.extend(other.resources);
        self.auxiliary_files.extend(other.auxiliary_files);
    }
}

/// Compose the given extensions against the project's extension settings.
///
/// `extensions` is passed separately from `config.extensions` so callers can
/// compose an effective set (for example one widened by trigger requirements).
pub fn compose(
    extensions: &BTreeSet<ExtensionId>,
    config: &ProjectConfig,
) -> Result<ManifestFragment> {
    for (first, second) in CONFLICTS {
        if extensions.contains(first) && extensions.contains(second) {
            return Err(GenerationError::ConflictingExtensions {
                first: first.id(),
                second: second.id(),
            });
        }
    }

    let mut fragment = ManifestFragment::default();
    // BTreeSet iterates in canonical order
    for extension in extensions {
        debug!(extension = extension.id(), "composing extension");
        fragment.merge(contribution(*extension, config)?);
    }
    Ok(fragment)
}

fn contribution(extension: ExtensionId, config: &ProjectConfig) -> Result<ManifestFragment> {
    let fragment = match extension {
        ExtensionId::UnitTests => ManifestFragment {
            dev_dependencies: vec![dep("jest", "^29.7.0")],
            scripts: vec![("test", "jest")],
            auxiliary_files: vec![GeneratedFile::new(
                "jest.config.js",
                templates::JEST_CONFIG,
            )],
            ..Default::default()
        },
        ExtensionId::BundlerWebpack => ManifestFragment {
            dev_dependencies: vec![
                dep("serverless-webpack", "^5.13.0"),
                dep("webpack", "^5.89.0"),
                dep("webpack-node-externals", "^3.0.0"),
            ],
            plugins: vec!["serverless-webpack"],
            custom: yaml_fragment(templates::WEBPACK_CUSTOM)?,
            auxiliary_files: vec![GeneratedFile::new(
                "webpack.config.js",
                templates::WEBPACK_CONFIG,
            )],
            ..Default::default()
        },
        ExtensionId::StorageTable => ManifestFragment {
            dependencies: vec![
                dep("@aws-sdk/client-dynamodb", "^3.470.0"),
                dep("@aws-sdk/lib-dynamodb", "^3.470.0"),
            ],
            environment: yaml_fragment(templates::DYNAMODB_ENVIRONMENT)?,
            iam_statements: yaml_sequence(templates::DYNAMODB_IAM)?,
            resources: yaml_fragment(templates::DYNAMODB_RESOURCES)?,
            ..Default::default()
        },
        ExtensionId::Auth => ManifestFragment {
            environment: yaml_fragment(templates::COGNITO_ENVIRONMENT)?,
            resources: yaml_fragment(templates::COGNITO_RESOURCES)?,
            ..Default::default()
        },
        ExtensionId::BundlerEsbuild => ManifestFragment {
            dev_dependencies: vec![
                dep("esbuild", "^0.19.8"),
                dep("serverless-esbuild", "^1.50.0"),
            ],
            plugins: vec!["serverless-esbuild"],
            custom: yaml_fragment(templates::ESBUILD_CUSTOM)?,
            ..Default::default()
        },
        ExtensionId::CustomDomain => {
            let domain = required(extension, "domain", config.domain.as_deref())?;
            let cert = required(extension, "cert", config.cert.as_deref())?;

            let mut settings = yaml_fragment(templates::DOMAIN_MANAGER_CUSTOM)?;
            settings.insert("domainName".into(), domain.into());
            settings.insert("certificateName".into(), cert.into());

            let mut custom = Mapping::new();
            custom.insert("customDomain".into(), Value::Mapping(settings));

            ManifestFragment {
                dev_dependencies: vec![dep("serverless-domain-manager", "^7.3.0")],
                plugins: vec!["serverless-domain-manager"],
                custom,
                ..Default::default()
            }
        }
        ExtensionId::Telemetry => {
            let dsn = required(extension, "telemetryDsn", config.telemetry_dsn.as_deref())?;
            url::Url::parse(dsn).map_err(|e| {
                GenerationError::invalid_config(format!(
                    "Telemetry DSN '{}' is not a URL: {}",
                    dsn, e
                ))
            })?;

            let mut environment = Mapping::new();
            environment.insert("SENTRY_DSN".into(), dsn.into());

            ManifestFragment {
                dependencies: vec![dep("@sentry/serverless", "^7.86.0")],
                environment,
                ..Default::default()
            }
        }
        ExtensionId::PruneOldVersions => ManifestFragment {
            dev_dependencies: vec![dep("serverless-prune-plugin", "^2.0.2")],
            plugins: vec!["serverless-prune-plugin"],
            custom: yaml_fragment(templates::PRUNE_CUSTOM)?,
            ..Default::default()
        },
        ExtensionId::Dotenv => ManifestFragment {
            dev_dependencies: vec![dep("serverless-dotenv-plugin", "^6.0.0")],
            plugins: vec!["serverless-dotenv-plugin"],
            auxiliary_files: vec![GeneratedFile::new(".env", templates::DOTENV)],
            ..Default::default()
        },
    };
    Ok(fragment)
}

fn required<'a>(
    extension: ExtensionId,
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(GenerationError::MissingRequiredField {
            extension: extension.id(),
            field,
        }),
    }
}

/// Parse an embedded YAML snippet that must be a mapping
fn yaml_fragment(source: &str) -> Result<Mapping> {
    match serde_yaml::from_str(source)? {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(GenerationError::invalid_config(format!(
            "Embedded fragment is not a mapping: {:?}",
            other
        ))),
    }
}

/// Parse an embedded YAML snippet that must be a sequence
fn yaml_sequence(source: &str) -> Result<Vec<Value>> {
    match serde_yaml::from_str(source)? {
        Value::Sequence(items) => Ok(items),
        other => Err(GenerationError::invalid_config(format!(
            "Embedded fragment is not a sequence: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(extensions: &[ExtensionId]) -> BTreeSet<ExtensionId> {
        extensions.iter().copied().collect()
    }

    fn config() -> ProjectConfig {
        ProjectConfig::new("svc")
    }

    #[test]
    fn test_empty_set_contributes_nothing() {
        let fragment = compose(&BTreeSet::new(), &config()).unwrap();
        assert_eq!(fragment, ManifestFragment::default());
    }

    #[test]
    fn test_bundlers_conflict_regardless_of_other_members() {
        for extra in ExtensionId::ALL {
            let extensions = set(&[
                ExtensionId::BundlerWebpack,
                ExtensionId::BundlerEsbuild,
                extra,
            ]);
            let err = compose(&extensions, &config()).unwrap_err();
            assert!(
                matches!(err, GenerationError::ConflictingExtensions { .. }),
                "expected conflict with extra {:?}, got {:?}",
                extra,
                err
            );
        }
    }

    #[test]
    fn test_custom_domain_requires_domain_and_cert() {
        let extensions = set(&[ExtensionId::CustomDomain]);

        let mut config = config();
        config.domain = Some(String::new());
        config.cert = Some("*.myapp.com".to_string());
        let err = compose(&extensions, &config).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MissingRequiredField {
                field: "domain",
                ..
            }
        ));

        config.domain = Some("api.myapp.com".to_string());
        config.cert = None;
        let err = compose(&extensions, &config).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MissingRequiredField {
                field: "cert",
                ..
            }
        ));

        config.cert = Some("*.myapp.com".to_string());
        let fragment = compose(&extensions, &config).unwrap();
        assert_eq!(fragment.plugins, vec!["serverless-domain-manager"]);
        let domain = fragment
            .custom
            .get("customDomain")
            .and_then(|v| v.get("domainName"))
            .and_then(Value::as_str);
        assert_eq!(domain, Some("api.myapp.com"));
    }

    #[test]
    fn test_telemetry_requires_dsn() {
        let extensions = set(&[ExtensionId::Telemetry]);
        let err = compose(&extensions, &config()).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MissingRequiredField {
                field: "telemetryDsn",
                ..
            }
        ));

        let mut config = config();
        config.telemetry_dsn = Some("not a url".to_string());
        let err = compose(&extensions, &config).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidConfig { .. }));

        config.telemetry_dsn = Some("https://abc@o1.ingest.sentry.io/42".to_string());
        let fragment = compose(&extensions, &config).unwrap();
        assert_eq!(
            fragment.environment.get("SENTRY_DSN").and_then(Value::as_str),
            Some("https://abc@o1.ingest.sentry.io/42")
        );
    }

    #[test]
    fn test_contributions_follow_canonical_order() {
        let extensions = set(&[
            ExtensionId::Dotenv,
            ExtensionId::PruneOldVersions,
            ExtensionId::BundlerWebpack,
        ]);
        let fragment = compose(&extensions, &config()).unwrap();
        assert_eq!(
            fragment.plugins,
            vec![
                "serverless-webpack",
                "serverless-prune-plugin",
                "serverless-dotenv-plugin"
            ]
        );
        let paths: Vec<_> = fragment
            .auxiliary_files
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        assert_eq!(paths, vec!["webpack.config.js", ".env"]);
    }

    #[test]
    fn test_embedded_fragments_parse() {
        let extensions = set(&[
            ExtensionId::UnitTests,
            ExtensionId::BundlerEsbuild,
            ExtensionId::StorageTable,
            ExtensionId::Auth,
            ExtensionId::PruneOldVersions,
        ]);
        let fragment = compose(&extensions, &config()).unwrap();
        assert!(fragment.resources.contains_key("DataTable"));
        assert!(fragment.resources.contains_key("UserPool"));
        assert!(fragment.environment.contains_key("TABLE_NAME"));
        assert!(fragment.environment.contains_key("USER_POOL_ID"));
        assert_eq!(fragment.iam_statements.len(), 1);
        assert!(fragment.custom.contains_key("esbuild"));
        assert!(fragment.custom.contains_key("prune"));
    }
}

//! Optional project extensions
//!
//! The set of extensions is closed. Declaration order of `ExtensionId` is the
//! canonical order: every contribution is applied in that order, whatever
//! order the caller listed the extensions in.

pub mod composer;

use std::fmt;

pub use composer::{compose, Dependency, ManifestFragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExtensionId {
    UnitTests,
    BundlerWebpack,
    StorageTable,
    Auth,
    BundlerEsbuild,
    CustomDomain,
    Telemetry,
    PruneOldVersions,
    Dotenv,
}

impl ExtensionId {
    /// All extensions in canonical order
    pub const ALL: [ExtensionId; 9] = [
        ExtensionId::UnitTests,
        ExtensionId::BundlerWebpack,
        ExtensionId::StorageTable,
        ExtensionId::Auth,
        ExtensionId::BundlerEsbuild,
        ExtensionId::CustomDomain,
        ExtensionId::Telemetry,
        ExtensionId::PruneOldVersions,
        ExtensionId::Dotenv,
    ];

    /// Canonical id used in project files
    pub fn id(&self) -> &'static str {
        match self {
            ExtensionId::UnitTests => "unitTests",
            ExtensionId::BundlerWebpack => "bundlerWebpack",
            ExtensionId::StorageTable => "storageTable",
            ExtensionId::Auth => "auth",
            ExtensionId::BundlerEsbuild => "bundlerEsbuild",
            ExtensionId::CustomDomain => "customDomain",
            ExtensionId::Telemetry => "telemetry",
            ExtensionId::PruneOldVersions => "pruneOldVersions",
            ExtensionId::Dotenv => "dotenv",
        }
    }

    /// Human-readable title, as shown in the extension menu
    pub fn display_name(&self) -> &'static str {
        match self {
            ExtensionId::UnitTests => "Unit tests – Jest",
            ExtensionId::BundlerWebpack => "Webpack – serverless-webpack",
            ExtensionId::StorageTable => "Database storage – DynamoDB table",
            ExtensionId::Auth => "Authentication – Cognito user pool",
            ExtensionId::BundlerEsbuild => "ESbuild – serverless-esbuild",
            ExtensionId::CustomDomain => "Custom domain – serverless-domain-manager",
            ExtensionId::Telemetry => "Sentry – @sentry/serverless",
            ExtensionId::PruneOldVersions => "Prune old versions – serverless-prune-plugin",
            ExtensionId::Dotenv => "Load .env into serverless – serverless-dotenv-plugin",
        }
    }

    /// Parse a canonical id or one of the package-style aliases
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unitTests" | "jest" => Some(ExtensionId::UnitTests),
            "bundlerWebpack" | "webpack" => Some(ExtensionId::BundlerWebpack),
            "storageTable" | "dynamodb" => Some(ExtensionId::StorageTable),
            "auth" | "cognito" => Some(ExtensionId::Auth),
            "bundlerEsbuild" | "esbuild" | "serverless-esbuild" => {
                Some(ExtensionId::BundlerEsbuild)
            }
            "customDomain" | "domain-manager" | "serverless-domain-manager" => {
                Some(ExtensionId::CustomDomain)
            }
            "telemetry" | "sentry" => Some(ExtensionId::Telemetry),
            "pruneOldVersions" | "serverless-prune-plugin" => Some(ExtensionId::PruneOldVersions),
            "dotenv" | "serverless-dotenv-plugin" => Some(ExtensionId::Dotenv),
            _ => None,
        }
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_canonical_ids() {
        for extension in ExtensionId::ALL {
            assert_eq!(ExtensionId::parse(extension.id()), Some(extension));
        }
    }

    #[test]
    fn test_parse_package_aliases() {
        assert_eq!(ExtensionId::parse("jest"), Some(ExtensionId::UnitTests));
        assert_eq!(
            ExtensionId::parse("serverless-domain-manager"),
            Some(ExtensionId::CustomDomain)
        );
        assert_eq!(ExtensionId::parse("sentry"), Some(ExtensionId::Telemetry));
        assert_eq!(ExtensionId::parse("Webpack"), None);
    }

    #[test]
    fn test_canonical_order_is_declaration_order() {
        let mut shuffled = vec![
            ExtensionId::Dotenv,
            ExtensionId::UnitTests,
            ExtensionId::CustomDomain,
            ExtensionId::BundlerWebpack,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                ExtensionId::UnitTests,
                ExtensionId::BundlerWebpack,
                ExtensionId::CustomDomain,
                ExtensionId::Dotenv,
            ]
        );
    }
}

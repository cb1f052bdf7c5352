//! Embedded templates and the generated file tree
//!
//! This module provides:
//! - Static template content, compiled into the binary (nothing is fetched)
//! - `{{KEY}}` placeholder substitution
//! - The file tree builder that renders one project from a synthesized manifest

pub mod tree;

pub use tree::build;

pub const HANDLER_HTTP: &str = include_str!("../../templates/handler-http.js");
pub const HANDLER_EVENT: &str = include_str!("../../templates/handler-event.js");
pub const SENTRY_PRELUDE: &str = include_str!("../../templates/sentry-prelude.js");
pub const WEBPACK_CONFIG: &str = include_str!("../../templates/webpack.config.js");
pub const JEST_CONFIG: &str = include_str!("../../templates/jest.config.js");
pub const DOTENV: &str = include_str!("../../templates/dotenv");
pub const GITIGNORE: &str = include_str!("../../templates/gitignore");
pub const README: &str = include_str!("../../templates/README.md");

// Descriptor snippets merged by the extension composer
pub const WEBPACK_CUSTOM: &str = include_str!("../../templates/fragments/webpack-custom.yml");
pub const ESBUILD_CUSTOM: &str = include_str!("../../templates/fragments/esbuild-custom.yml");
pub const DOMAIN_MANAGER_CUSTOM: &str =
    include_str!("../../templates/fragments/domain-manager-custom.yml");
pub const PRUNE_CUSTOM: &str = include_str!("../../templates/fragments/prune-custom.yml");
pub const DYNAMODB_ENVIRONMENT: &str =
    include_str!("../../templates/fragments/dynamodb-environment.yml");
pub const DYNAMODB_IAM: &str = include_str!("../../templates/fragments/dynamodb-iam.yml");
pub const DYNAMODB_RESOURCES: &str =
    include_str!("../../templates/fragments/dynamodb-resources.yml");
pub const COGNITO_ENVIRONMENT: &str =
    include_str!("../../templates/fragments/cognito-environment.yml");
pub const COGNITO_RESOURCES: &str = include_str!("../../templates/fragments/cognito-resources.yml");

/// One file of the generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Archive-relative path, `/` separated
    pub path: String,
    pub content: Vec<u8>,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Content as text, for inspection
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Replace every `{{KEY}}` in `template` with its value
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{{{}}}}}", key), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let out = render(
            "{{NAME}} says hi to {{NAME}} via {{TRIGGERS}}",
            &[("NAME", "api"), ("TRIGGERS", "GET /api")],
        );
        assert_eq!(out, "api says hi to api via GET /api");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{{OTHER}}", &[("NAME", "x")]), "{{OTHER}}");
    }

    #[test]
    fn test_handler_templates_have_placeholders() {
        for template in [HANDLER_HTTP, HANDLER_EVENT] {
            assert!(template.contains("{{FUNCTION_NAME}}"));
            assert!(template.contains("{{PRELUDE}}"));
            assert!(template.contains("{{EXPORT}}"));
        }
    }
}

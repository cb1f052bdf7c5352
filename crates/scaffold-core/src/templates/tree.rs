//! File tree builder
//!
//! Output order is part of the archive contract: descriptor, dependency
//! manifest, handlers in function order, extension files in canonical order,
//! then the base supporting files.

use super::{
    render, GeneratedFile, GITIGNORE, HANDLER_EVENT, HANDLER_HTTP, README, SENTRY_PRELUDE,
};
use crate::config::{FunctionSpec, ProjectConfig};
use crate::error::{GenerationError, Result};
use crate::extensions::ExtensionId;
use crate::manifest::{Synthesis, DEPENDENCY_MANIFEST_PATH, DESCRIPTOR_PATH};
use crate::triggers;
use std::collections::HashMap;

pub const GITIGNORE_PATH: &str = ".gitignore";
pub const README_PATH: &str = "README.md";

/// Characters JavaScript treats as line terminators
const LINE_TERMINATORS: [char; 4] = ['\r', '\n', '\u{2028}', '\u{2029}'];

/// Render every file of the project
pub fn build(config: &ProjectConfig, synthesis: &Synthesis) -> Result<Vec<GeneratedFile>> {
    let telemetry = synthesis.extensions.contains(&ExtensionId::Telemetry);

    let mut files =
        Vec::with_capacity(config.functions.len() + synthesis.auxiliary_files.len() + 4);
    files.push(GeneratedFile::new(
        DESCRIPTOR_PATH,
        synthesis.descriptor.render()?,
    ));
    files.push(GeneratedFile::new(
        DEPENDENCY_MANIFEST_PATH,
        synthesis.dependencies.render()?,
    ));

    // Handler paths are checked separately so the error can name both functions
    let mut handler_owners: HashMap<String, &str> = HashMap::new();
    for function in &config.functions {
        let path = function.handler_path();
        if let Some(first) = handler_owners.insert(path.clone(), &function.name) {
            return Err(GenerationError::DuplicateOutputPath {
                path,
                first: first.to_string(),
                second: function.name.clone(),
            });
        }
        files.push(GeneratedFile::new(path, handler_stub(function, telemetry)));
    }

    files.extend(synthesis.auxiliary_files.iter().cloned());
    files.push(GeneratedFile::new(GITIGNORE_PATH, GITIGNORE));
    files.push(GeneratedFile::new(README_PATH, readme(config, synthesis)));

    ensure_unique_paths(&files)?;
    Ok(files)
}

/// Handler stub matching the function's trigger shape
fn handler_stub(function: &FunctionSpec, telemetry: bool) -> String {
    let template = if function.is_http() {
        HANDLER_HTTP
    } else {
        HANDLER_EVENT
    };
    let (prelude, export) = if telemetry {
        (
            format!("\n{}", SENTRY_PRELUDE),
            "Sentry.AWSLambda.wrapHandler(handler)",
        )
    } else {
        (String::new(), "handler")
    };
    // Trigger text lands in a line comment and must stay on one line
    let summary = single_line(&triggers::summarize_function(function));

    render(
        template,
        &[
            ("PRELUDE", prelude.as_str()),
            ("EXPORT", export),
            ("FUNCTION_NAME", function.name.as_str()),
            ("TRIGGERS", summary.as_str()),
        ],
    )
}

fn readme(config: &ProjectConfig, synthesis: &Synthesis) -> String {
    let functions = if config.functions.is_empty() {
        "No functions yet.".to_string()
    } else {
        config
            .functions
            .iter()
            .map(|f| {
                let summary = single_line(&triggers::summarize_function(f));
                format!("- `{}` ({}): {}", f.name, f.handler_path(), summary)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let extensions = if synthesis.extensions.is_empty() {
        "None.".to_string()
    } else {
        synthesis
            .extensions
            .iter()
            .map(|e| format!("- {}", e.display_name()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    render(
        README,
        &[
            ("PROJECT_NAME", config.name.as_str()),
            ("EXTENSIONS", extensions.as_str()),
            ("FUNCTIONS", functions.as_str()),
        ],
    )
}

fn single_line(text: &str) -> String {
    text.replace(LINE_TERMINATORS, " ")
}

fn ensure_unique_paths(files: &[GeneratedFile]) -> Result<()> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, file) in files.iter().enumerate() {
        if let Some(first) = seen.insert(&file.path, index) {
            return Err(GenerationError::DuplicateOutputPath {
                path: file.path.clone(),
                first: format!("file #{}", first),
                second: format!("file #{}", index),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpMethod, TriggerSpec};
    use crate::manifest::synthesize;

    fn build_for(config: &ProjectConfig) -> Result<Vec<GeneratedFile>> {
        let synthesis = synthesize(config)?;
        build(config, &synthesis)
    }

    fn paths(files: &[GeneratedFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_file_order() {
        let config = ProjectConfig::new("svc")
            .with_extension(ExtensionId::Dotenv)
            .with_extension(ExtensionId::UnitTests)
            .with_function(FunctionSpec::new("second-b"))
            .with_function(FunctionSpec::new("first-a"));
        let files = build_for(&config).unwrap();
        assert_eq!(
            paths(&files),
            vec![
                "serverless.yml",
                "package.json",
                "handlers/second-b.js",
                "handlers/first-a.js",
                "jest.config.js",
                ".env",
                ".gitignore",
                "README.md",
            ]
        );
    }

    #[test]
    fn test_http_and_event_stubs() {
        let config = ProjectConfig::new("svc")
            .with_function(
                FunctionSpec::new("api").with_trigger(TriggerSpec::http(HttpMethod::Get, "/api")),
            )
            .with_function(
                FunctionSpec::new("job").with_trigger(TriggerSpec::ScheduleRate { rate: None }),
            );
        let files = build_for(&config).unwrap();

        let api = files[2].text();
        assert!(api.contains("statusCode: 200"));
        assert!(api.contains("// Triggers: GET /api"));
        assert!(api.contains("module.exports.handler = handler;"));
        assert!(!api.contains("{{"));

        let job = files[3].text();
        assert!(job.contains("received event"));
        assert!(job.contains("every 30 minutes"));
        assert!(!job.contains("statusCode"));
    }

    #[test]
    fn test_telemetry_wraps_handlers() {
        let mut config = ProjectConfig::new("svc")
            .with_extension(ExtensionId::Telemetry)
            .with_function(FunctionSpec::new("job"));
        config.telemetry_dsn = Some("https://k@o1.ingest.sentry.io/1".to_string());
        let files = build_for(&config).unwrap();
        let job = files[2].text();
        assert!(job.contains("require('@sentry/serverless')"));
        assert!(job.contains("Sentry.AWSLambda.wrapHandler(handler)"));
    }

    #[test]
    fn test_duplicate_function_names_rejected() {
        let config = ProjectConfig::new("svc")
            .with_function(FunctionSpec::new("api"))
            .with_function(FunctionSpec::new("api"));
        let err = build_for(&config).unwrap_err();
        assert!(matches!(err, GenerationError::DuplicateOutputPath { .. }));
    }

    #[test]
    fn test_handler_path_collision_detected_by_builder() {
        let config = ProjectConfig::new("svc")
            .with_function(FunctionSpec::new("api"))
            .with_function(FunctionSpec::new("api"));
        // Skip the synthesizer's key check to exercise the builder's own check
        let synthesis = synthesize(&ProjectConfig::new("svc")).unwrap();
        let err = build(&config, &synthesis).unwrap_err();
        match err {
            GenerationError::DuplicateOutputPath { path, .. } => {
                assert_eq!(path, "handlers/api.js")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_readme_lists_functions_with_previews() {
        let config = ProjectConfig::new("svc").with_function(
            FunctionSpec::new("Users").with_trigger(TriggerSpec::Http {
                method: HttpMethod::Post,
                path: None,
            }),
        );
        let files = build_for(&config).unwrap();
        let readme = files.last().unwrap().text();
        assert!(readme.starts_with("# svc"));
        assert!(readme.contains("- `Users` (handlers/Users.js): POST /users"));
        assert!(readme.contains("None."));
    }

    #[test]
    fn test_trigger_text_cannot_leave_comment() {
        let path = "/x\u{2028}process.exit(1)\u{2029}\r\n";
        let trigger = TriggerSpec::http(HttpMethod::Get, path);
        let function = FunctionSpec::new("api").with_trigger(trigger);
        let config = ProjectConfig::new("svc").with_function(function);
        let files = build_for(&config).unwrap();

        let handler = files[2].text();
        let comment = handler
            .lines()
            .find(|line| line.starts_with("// Triggers:"))
            .unwrap();
        assert_eq!(comment, "// Triggers: GET /x process.exit(1)   ");
        assert!(!handler.contains(['\u{2028}', '\u{2029}', '\r']));

        let readme = files.last().unwrap().text();
        assert!(!readme.contains(['\u{2028}', '\u{2029}']));
    }

    #[test]
    fn test_no_entry_is_empty() {
        let config = ProjectConfig::new("svc")
            .with_extension(ExtensionId::Dotenv)
            .with_extension(ExtensionId::BundlerWebpack)
            .with_function(FunctionSpec::new("job"));
        for file in build_for(&config).unwrap() {
            assert!(!file.content.is_empty(), "{} is empty", file.path);
        }
    }
}

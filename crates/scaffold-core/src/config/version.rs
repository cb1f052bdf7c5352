//! Version comparison between the engine and project files

use semver::Version;

/// Compare the engine version against the version a project file was written for.
/// Returns a warning message if the engine is older than the file expects.
pub fn check_compatibility(engine_version: &str, file_version: &str) -> Option<String> {
    let engine = parse_version(engine_version)?;
    let file = parse_version(file_version)?;

    if engine < file {
        Some(format!(
            "This project file was written for scaffold version {} or newer.\n\
             You are running version {}; newer options may be ignored.",
            file_version, engine_version
        ))
    } else {
        None
    }
}

/// Parse a version string, tolerating a leading 'v'.
/// Unparseable versions can't be compared and yield None.
fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}

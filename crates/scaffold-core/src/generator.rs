//! The generation pipeline
//!
//! validate → synthesize → build → pack. Any failure aborts before packing.
//! Nothing is shared between calls.

use crate::archive;
use crate::config::ProjectConfig;
use crate::error::{GenerationError, Result};
use crate::manifest;
use crate::templates::{self, GeneratedFile};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Environment variable overriding the archive size budget
pub const MAX_ARCHIVE_BYTES_ENV: &str = "SLS_SCAFFOLD_MAX_ARCHIVE_BYTES";

/// Environment variable overriding the file count budget
pub const MAX_FILES_ENV: &str = "SLS_SCAFFOLD_MAX_FILES";

/// Budgets a host may impose on one generation. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationLimits {
    pub max_archive_bytes: Option<u64>,
    pub max_files: Option<u64>,
    pub max_duration: Option<Duration>,
}

impl GenerationLimits {
    /// Limits read from the environment; unset variables leave a budget unbounded
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            max_archive_bytes: env_u64(MAX_ARCHIVE_BYTES_ENV)?,
            max_files: env_u64(MAX_FILES_ENV)?,
            max_duration: None,
        })
    }

    fn check(&self, resource: &'static str, limit: Option<u64>, actual: u64) -> Result<()> {
        match limit {
            Some(limit) if actual > limit => Err(GenerationError::ResourceExhausted {
                resource,
                limit,
                actual,
            }),
            _ => Ok(()),
        }
    }

    fn check_elapsed(&self, started: Instant) -> Result<()> {
        let elapsed = started.elapsed();
        match self.max_duration {
            Some(limit) if elapsed > limit => Err(GenerationError::ResourceExhausted {
                resource: "time (ns)",
                limit: nanos(limit),
                actual: nanos(elapsed),
            }),
            _ => Ok(()),
        }
    }
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            GenerationError::invalid_config(format!("{} must be a number, got '{}'", name, value))
        }),
        Err(_) => Ok(None),
    }
}

/// Generate the project archive with no budgets
pub fn generate(config: &ProjectConfig) -> Result<Vec<u8>> {
    generate_with_limits(config, &GenerationLimits::default())
}

/// Generate the project archive, failing if any budget is exceeded
pub fn generate_with_limits(config: &ProjectConfig, limits: &GenerationLimits) -> Result<Vec<u8>> {
    let started = Instant::now();

    let files = build_files(config, limits, started)?;
    let bytes = archive::pack(&files)?;

    limits.check("archive size", limits.max_archive_bytes, bytes.len() as u64)?;
    limits.check_elapsed(started)?;

    info!(
        project = %config.name,
        files = files.len(),
        bytes = bytes.len(),
        "generated archive"
    );
    Ok(bytes)
}

/// Generate the project's files without packaging them
pub fn generate_files(config: &ProjectConfig) -> Result<Vec<GeneratedFile>> {
    generate_files_with_limits(config, &GenerationLimits::default())
}

/// Generate the project's files, failing if the file or time budget is exceeded
pub fn generate_files_with_limits(
    config: &ProjectConfig,
    limits: &GenerationLimits,
) -> Result<Vec<GeneratedFile>> {
    build_files(config, limits, Instant::now())
}

fn build_files(
    config: &ProjectConfig,
    limits: &GenerationLimits,
    started: Instant,
) -> Result<Vec<GeneratedFile>> {
    config.validate()?;
    debug!(project = %config.name, "configuration valid");

    let synthesis = manifest::synthesize(config)?;
    debug!(
        functions = synthesis.descriptor.functions.len(),
        plugins = synthesis.descriptor.plugins.len(),
        "manifests synthesized"
    );

    let files = templates::build(config, &synthesis)?;

    limits.check("file count", limits.max_files, files.len() as u64)?;
    limits.check_elapsed(started)?;

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FunctionSpec, HttpMethod, TriggerSpec};
    use crate::extensions::ExtensionId;

    fn config() -> ProjectConfig {
        ProjectConfig::new("hello-world").with_function(
            FunctionSpec::new("hello-world")
                .with_trigger(TriggerSpec::http(HttpMethod::Get, "/hello-world")),
        )
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = config()
            .with_extension(ExtensionId::BundlerWebpack)
            .with_extension(ExtensionId::UnitTests);
        assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }

    #[test]
    fn test_invalid_config_produces_no_archive() {
        let err = generate(&ProjectConfig::new("")).unwrap_err();
        assert!(err.is_invalid_config());
    }

    #[test]
    fn test_file_budget() {
        let limits = GenerationLimits {
            max_files: Some(2),
            ..Default::default()
        };
        let err = generate_with_limits(&config(), &limits).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ResourceExhausted {
                resource: "file count",
                limit: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_archive_budget() {
        let limits = GenerationLimits {
            max_archive_bytes: Some(64),
            ..Default::default()
        };
        let err = generate_with_limits(&config(), &limits).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ResourceExhausted {
                resource: "archive size",
                ..
            }
        ));
    }

    #[test]
    fn test_generous_budgets_pass() {
        let limits = GenerationLimits {
            max_archive_bytes: Some(1 << 20),
            max_files: Some(100),
            max_duration: Some(Duration::from_secs(60)),
        };
        assert!(generate_with_limits(&config(), &limits).is_ok());
    }

    #[test]
    fn test_time_budget() {
        let limits = GenerationLimits {
            max_duration: Some(Duration::from_nanos(1)),
            ..Default::default()
        };
        let err = generate_with_limits(&config(), &limits).unwrap_err();
        match err {
            GenerationError::ResourceExhausted {
                resource: "time (ns)",
                limit,
                actual,
            } => {
                assert_eq!(limit, 1);
                assert!(actual > limit);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = generate_files_with_limits(&config(), &limits).unwrap_err();
        assert!(matches!(err, GenerationError::ResourceExhausted { .. }));
    }

    #[test]
    fn test_sub_millisecond_budget_is_not_truncated() {
        let budget = Duration::from_micros(500);
        let limits = GenerationLimits {
            max_duration: Some(budget),
            ..Default::default()
        };
        let started = Instant::now() - Duration::from_micros(900);
        let err = limits.check_elapsed(started).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ResourceExhausted {
                limit: 500_000,
                ..
            }
        ));
    }

    #[test]
    fn test_generate_files_matches_archive() {
        let files = generate_files(&config()).unwrap();
        let unpacked = archive::unpack(&generate(&config()).unwrap()).unwrap();
        assert_eq!(files, unpacked);
    }
}

//! Trigger descriptor resolution
//!
//! Maps each trigger variant to its deployment-descriptor event entry, the
//! extensions it depends on, and a one-line preview. Defaults for sparse
//! triggers are applied here, never at construction time.

use crate::config::TriggerSpec;
use crate::extensions::ExtensionId;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;

pub const DEFAULT_RATE: &str = "30 minutes";
pub const DEFAULT_CRON: &str = "0 * * * ? *";
pub const DEFAULT_BUS: &str = "default";

/// Event type written by storage triggers
const S3_OBJECT_CREATED: &str = "s3:ObjectCreated:*";

/// A trigger resolved against its function
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrigger {
    /// One entry of the function's `events` list
    pub declaration: Value,
    /// Extensions the trigger cannot be deployed without
    pub required_extensions: BTreeSet<ExtensionId>,
    pub preview: String,
}

/// Resolve one trigger of the function named `function_name`
pub fn resolve(trigger: &TriggerSpec, function_name: &str) -> ResolvedTrigger {
    let declaration = match trigger {
        TriggerSpec::Http { method, path } => {
            let path = http_path(path.as_deref(), function_name);
            event(
                "http",
                mapping([
                    ("method", method.as_str().into()),
                    ("path", path.into()),
                ]),
            )
        }
        TriggerSpec::ScheduleRate { rate } => {
            let rate = or_default(rate.as_deref(), DEFAULT_RATE);
            event("schedule", format!("rate({})", rate).into())
        }
        TriggerSpec::ScheduleCron { cron } => {
            let cron = or_default(cron.as_deref(), DEFAULT_CRON);
            event("schedule", format!("cron({})", cron).into())
        }
        TriggerSpec::EventBridgeSource { source } => {
            let source = source.as_deref().unwrap_or_default();
            let pattern = mapping([("source", Value::Sequence(vec![source.into()]))]);
            event("eventBridge", mapping([("pattern", pattern)]))
        }
        TriggerSpec::EventBridgeBus { bus } => {
            let bus = or_default(bus.as_deref(), DEFAULT_BUS);
            // Without a pattern the rule would never match; accept any source
            let any_source = mapping([("prefix", "".into())]);
            let pattern = mapping([("source", Value::Sequence(vec![any_source]))]);
            event(
                "eventBridge",
                mapping([("eventBus", bus.into()), ("pattern", pattern)]),
            )
        }
        TriggerSpec::S3ObjectCreated { bucket } => {
            let bucket = bucket.as_deref().unwrap_or_default();
            event(
                "s3",
                mapping([
                    ("bucket", bucket.into()),
                    ("event", S3_OBJECT_CREATED.into()),
                ]),
            )
        }
    };

    ResolvedTrigger {
        declaration,
        required_extensions: required_extensions(trigger),
        preview: preview_text(trigger, Some(function_name)),
    }
}

/// Extensions a trigger depends on.
///
/// Every current variant deploys with the base provider alone.
fn required_extensions(trigger: &TriggerSpec) -> BTreeSet<ExtensionId> {
    match trigger {
        TriggerSpec::Http { .. }
        | TriggerSpec::ScheduleRate { .. }
        | TriggerSpec::ScheduleCron { .. }
        | TriggerSpec::EventBridgeSource { .. }
        | TriggerSpec::EventBridgeBus { .. }
        | TriggerSpec::S3ObjectCreated { .. } => BTreeSet::new(),
    }
}

/// Short summary of one trigger.
///
/// Without a function name an HTTP trigger lacking a path cannot know its
/// default route, so the preview says so instead of guessing.
pub fn preview_text(trigger: &TriggerSpec, function_name: Option<&str>) -> String {
    match trigger {
        TriggerSpec::Http { method, path } => match (path.as_deref(), function_name) {
            (Some(p), _) if !p.is_empty() => format!("{} {}", method, p),
            (_, Some(name)) => format!("{} {}", method, default_http_path(name)),
            (_, None) => format!("{} (default path)", method),
        },
        TriggerSpec::ScheduleRate { rate } => {
            format!("every {}", or_default(rate.as_deref(), DEFAULT_RATE))
        }
        TriggerSpec::ScheduleCron { cron } => {
            format!("cron {}", or_default(cron.as_deref(), DEFAULT_CRON))
        }
        TriggerSpec::EventBridgeSource { source } => match source.as_deref() {
            Some(s) if !s.is_empty() => format!("on {}", s),
            _ => "on (no source)".to_string(),
        },
        TriggerSpec::EventBridgeBus { bus } => {
            format!("bus: {}", or_default(bus.as_deref(), DEFAULT_BUS))
        }
        TriggerSpec::S3ObjectCreated { bucket } => match bucket.as_deref() {
            Some(b) if !b.is_empty() => format!("s3: {}", b),
            _ => "s3: (no bucket)".to_string(),
        },
    }
}

/// Route used when an HTTP trigger has no path
pub fn default_http_path(function_name: &str) -> String {
    format!("/{}", function_name.to_lowercase())
}

fn http_path(path: Option<&str>, function_name: &str) -> String {
    match path {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => default_http_path(function_name),
    }
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Value {
    let mut map = Mapping::new();
    for (key, value) in entries {
        map.insert(key.into(), value);
    }
    Value::Mapping(map)
}

fn event(kind: &str, body: Value) -> Value {
    mapping([(kind, body)])
}

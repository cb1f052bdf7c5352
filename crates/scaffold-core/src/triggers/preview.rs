//! Trigger summaries for live previews

use super::resolver::preview_text;
use crate::config::{FunctionSpec, TriggerSpec};

/// Shown for a function with no triggers
pub const NO_TRIGGERS: &str = "No triggers";

const SEPARATOR: &str = ", ";

/// Summarize a trigger list in input order.
///
/// Safe on partially edited lists: sparse triggers are summarized with their
/// defaults and nothing is validated.
pub fn summarize(triggers: &[TriggerSpec]) -> String {
    join(triggers, None)
}

/// Like [`summarize`], but HTTP triggers without a path show the route they
/// will actually get.
pub fn summarize_function(function: &FunctionSpec) -> String {
    join(&function.triggers, Some(&function.name))
}

fn join(triggers: &[TriggerSpec], function_name: Option<&str>) -> String {
    if triggers.is_empty() {
        return NO_TRIGGERS.to_string();
    }
    triggers
        .iter()
        .map(|t| preview_text(t, function_name))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

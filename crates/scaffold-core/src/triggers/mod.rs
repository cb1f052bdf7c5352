//! Trigger resolution and previews

pub mod preview;
pub mod resolver;

pub use preview::{summarize, summarize_function, NO_TRIGGERS};
pub use resolver::{resolve, ResolvedTrigger};

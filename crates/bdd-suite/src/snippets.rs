//! Step-definition templates for undefined steps.
//!
//! When a run reports undefined steps, the adapter writes a ready-to-fill
//! registration block to the diagnostic stream: one `step!` line plus a
//! placeholder handler that unconditionally fails, deduplicated by step
//! identity and wrapped in the highlight escapes engines use for undefined
//! output.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::engine::UndefinedStep;

/// ANSI escape opening an undefined-step highlight block.
pub const ANSI_UNDEFINED: &str = "\x1b[33m";

/// ANSI escape closing a highlight block.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Render the highlighted snippet block for the given undefined steps.
///
/// Steps are deduplicated by keyword and text, keeping first-encounter
/// order. Returns `None` when there is nothing to report.
#[must_use]
pub fn snippet_block(undefined: &[UndefinedStep]) -> Option<String> {
    if undefined.is_empty() {
        return None;
    }
    let mut body = String::new();
    body.push_str("\nYou can implement step definitions for undefined steps with these snippets:\n\n");
    let mut seen = HashSet::new();
    for step in undefined {
        if !seen.insert(step) {
            continue;
        }
        let _ = writeln!(
            body,
            "step!(StepKeyword::{:?}, \"{}\", unimplemented_step);",
            step.keyword,
            step.text.escape_default()
        );
        body.push_str(
            "fn unimplemented_step(_ctx: &mut StepContext) -> Result<(), StepError> {\n    \
             Err(StepError::new(\"unimplemented step\"))\n}\n\n",
        );
    }
    Some(format!("{ANSI_UNDEFINED}{body}{ANSI_RESET}"))
}

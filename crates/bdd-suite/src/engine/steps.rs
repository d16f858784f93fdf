//! Step definitions and the global step registry.
//!
//! Step handlers are plain functions registered at link time through the
//! [`step!`](crate::step!) macro and collected with `inventory`. Lookup is by
//! exact keyword and text; placeholder matching belongs to a full engine and
//! is deliberately out of scope for the reference runner.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Keyword categorising a step definition.
///
/// The Gherkin parser resolves `And`/`But` conjunctions to the preceding
/// step's type before this crate sees them, so only the primary keywords are
/// represented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Setup preconditions for a scenario.
    Given,
    /// Perform the action under test.
    When,
    /// Assert the expected outcome.
    Then,
}

impl StepKeyword {
    /// Return the keyword as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<gherkin::StepType> for StepKeyword {
    fn from(ty: gherkin::StepType) -> Self {
        match ty {
            gherkin::StepType::Given => Self::Given,
            gherkin::StepType::When => Self::When,
            gherkin::StepType::Then => Self::Then,
        }
    }
}

/// Failure reported by a step handler.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StepError(String);

impl StepError {
    /// Create a step failure with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Per-scenario state handed to step handlers.
///
/// Carries the live server URL (when the case runs under a server lifecycle)
/// and a string scratch store steps can use to share values within one
/// scenario. A fresh context is created for every scenario.
#[derive(Debug, Default)]
pub struct StepContext {
    server_url: Option<String>,
    values: HashMap<String, String>,
}

impl StepContext {
    /// Create a context, optionally bound to a live server URL.
    #[must_use]
    pub fn new(server_url: Option<String>) -> Self {
        Self {
            server_url,
            values: HashMap::new(),
        }
    }

    /// The URL of the live server backing this scenario, when present.
    #[must_use]
    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }

    /// Store a value for later steps in the same scenario.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Read a value stored by an earlier step.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Signature of a registered step handler.
pub type StepFn = fn(&mut StepContext) -> Result<(), StepError>;

/// One step definition registered with the global registry.
#[derive(Debug)]
pub struct StepDef {
    /// Keyword the definition responds to.
    pub keyword: StepKeyword,
    /// Step text matched exactly against scenario steps.
    pub pattern: &'static str,
    /// Handler executed when the step matches.
    pub run: StepFn,
    /// Source file of the definition.
    pub file: &'static str,
    /// Line number of the definition.
    pub line: u32,
}

inventory::collect!(StepDef);

/// Register a step definition with the global registry.
///
/// # Examples
///
/// ```
/// use bdd_suite::{StepContext, StepError, StepKeyword, step};
///
/// fn server_is_reachable(_ctx: &mut StepContext) -> Result<(), StepError> {
///     Ok(())
/// }
///
/// step!(StepKeyword::Given, "the server is reachable", server_is_reachable);
/// ```
#[macro_export]
macro_rules! step {
    ($keyword:expr, $pattern:expr, $handler:path) => {
        $crate::submit! {
            $crate::StepDef {
                keyword: $keyword,
                pattern: $pattern,
                run: $handler,
                file: file!(),
                line: line!(),
            }
        }
    };
}

/// Look up a registered step by keyword and exact text.
#[must_use]
pub fn find_step(keyword: StepKeyword, text: &str) -> Option<&'static StepDef> {
    inventory::iter::<StepDef>
        .into_iter()
        .find(|step| step.keyword == keyword && step.pattern == text)
}

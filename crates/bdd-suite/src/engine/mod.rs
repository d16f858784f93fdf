//! BDD engine seam.
//!
//! The engine parses scenario specifications and executes matching step
//! implementations. The host-facing contract is the [`BddEngine`] trait plus
//! the [`RunSummary`] it produces; [`GherkinRunner`] is the reference
//! implementation backed by the `gherkin` parser and the step registry in
//! [`steps`].

mod runner;
pub mod steps;

use std::io::Write;

use camino::Utf8PathBuf;
use thiserror::Error;

pub use self::runner::GherkinRunner;

use self::steps::StepKeyword;
use crate::config::RunConfig;

/// A scenario step with no matching implementation.
///
/// Identity is the keyword plus the step text; deduplication of repeated
/// occurrences is the snippet generator's job, so the engine reports every
/// occurrence it sees.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UndefinedStep {
    /// Keyword of the unmatched step.
    pub keyword: StepKeyword,
    /// Text of the unmatched step.
    pub text: String,
}

/// Aggregated result of one engine invocation.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of scenarios executed or attempted.
    pub scenarios: usize,
    /// Number of scenarios that failed, including those with undefined steps.
    pub failed: usize,
    /// Every undefined step encountered, in encounter order.
    pub undefined: Vec<UndefinedStep>,
}

impl RunSummary {
    /// Whether the run completed without failures or undefined steps.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failed == 0 && self.undefined.is_empty()
    }
}

/// Errors the engine cannot recover from within a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A feature file failed to parse; nothing in it was executed.
    #[error("{path}: {message}")]
    Parse {
        /// The feature file that failed to parse.
        path: Utf8PathBuf,
        /// The parser's error text.
        message: String,
    },
    /// The run configuration does not describe an executable run.
    #[error("configuration error: {0}")]
    Config(String),
    /// Output could not be written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses feature specifications and executes matching steps.
pub trait BddEngine {
    /// Execute every scenario reachable from the configured feature paths,
    /// streaming formatted progress to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] when a feature file does not parse,
    /// [`EngineError::Config`] when the configuration is not executable
    /// (for example, no feature files exist under the configured paths), and
    /// [`EngineError::Io`] when `out` rejects a write. Scenario failures are
    /// not errors; they are reported through the [`RunSummary`].
    fn run(&self, config: &RunConfig, out: &mut dyn Write) -> Result<RunSummary, EngineError>;
}

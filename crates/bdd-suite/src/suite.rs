//! Suite model: cases, outcomes, ordering, and the run report.
//!
//! A suite is an ordered collection of boxed [`SuiteCase`]s executed
//! sequentially. Fatal outcomes are a distinguished error kind the runner
//! checks for and stops on; mapping the report to a process exit status is
//! the caller's job, so nothing in here terminates the process.

use std::io::Write;

use thiserror::Error;

/// Severity class of a fatal outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FatalKind {
    /// A feature file failed to parse.
    Parse,
    /// The run configuration was not executable.
    Config,
}

impl std::fmt::Display for FatalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse => f.write_str("parse error"),
            Self::Config => f.write_str("configuration error"),
        }
    }
}

/// Error that ends the whole run, not just the current case.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct FatalError {
    kind: FatalKind,
    message: String,
}

impl FatalError {
    /// Create a fatal parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: FatalKind::Parse,
            message: message.into(),
        }
    }

    /// Create a fatal configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: FatalKind::Config,
            message: message.into(),
        }
    }

    /// The severity class of this error.
    #[must_use]
    pub fn kind(&self) -> FatalKind {
        self.kind
    }

    /// The underlying error text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of running one suite case.
#[derive(Debug)]
#[must_use]
pub enum CaseOutcome {
    /// The case passed.
    Passed,
    /// The case failed; the run continues unless fail-fast is set.
    Failed {
        /// Description of the failure.
        message: String,
    },
    /// The case hit an unrecoverable error; the run stops here.
    Fatal(FatalError),
}

/// One executable member of a suite.
pub trait SuiteCase {
    /// Name used in reports and diagnostics.
    fn name(&self) -> &str;

    /// Whether the case depends on a live server lifecycle. Server-dependent
    /// cases are grouped together by [`Suite::reorder`].
    fn requires_server(&self) -> bool {
        false
    }

    /// Execute the case, streaming progress to `out` and diagnostics to
    /// `diag`.
    fn run(&mut self, out: &mut dyn Write, diag: &mut dyn Write) -> CaseOutcome;
}

/// A recorded case failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseFailure {
    /// Name of the failing case.
    pub case: String,
    /// Description of the failure.
    pub message: String,
}

/// Aggregated result of a suite run.
#[derive(Debug, Default)]
pub struct SuiteReport {
    /// Number of cases that ran before the run ended.
    pub executed: usize,
    /// Number of cases that passed.
    pub passed: usize,
    /// Failures collected during the run.
    pub failures: Vec<CaseFailure>,
    /// The fatal error that stopped the run, when one occurred.
    pub fatal: Option<FatalError>,
}

impl SuiteReport {
    /// Whether every executed case passed and nothing was fatal.
    #[must_use]
    pub fn success(&self) -> bool {
        self.failures.is_empty() && self.fatal.is_none()
    }

    /// The process exit status this report maps to.
    #[must_use]
    pub fn exit_code(&self) -> std::process::ExitCode {
        if self.success() {
            std::process::ExitCode::SUCCESS
        } else {
            std::process::ExitCode::FAILURE
        }
    }

    /// Write a human-readable summary of the run.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing to `out`.
    pub fn write_summary(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{} case(s) run, {} passed", self.executed, self.passed)?;
        for failure in &self.failures {
            writeln!(out, "failed: {}: {}", failure.case, failure.message)?;
        }
        if let Some(fatal) = &self.fatal {
            writeln!(out, "fatal: {fatal}")?;
        }
        Ok(())
    }
}

/// Ordered collection of suite cases.
#[derive(Default)]
pub struct Suite {
    cases: Vec<Box<dyn SuiteCase>>,
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("cases", &self.case_names())
            .finish()
    }
}

impl Suite {
    /// Create an empty suite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case, preserving insertion order.
    pub fn push(&mut self, case: Box<dyn SuiteCase>) {
        self.cases.push(case);
    }

    /// Number of cases in the suite.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the suite has no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// The case names in execution order.
    #[must_use]
    pub fn case_names(&self) -> Vec<&str> {
        self.cases.iter().map(|case| case.name()).collect()
    }

    /// Stable reorder grouping server-dependent cases after the rest, so
    /// server startup and teardown never interleave with ordinary cases.
    #[must_use]
    pub fn reorder(mut self) -> Self {
        let mut plain = Vec::with_capacity(self.cases.len());
        let mut server = Vec::new();
        for case in self.cases.drain(..) {
            if case.requires_server() {
                server.push(case);
            } else {
                plain.push(case);
            }
        }
        plain.extend(server);
        Self { cases: plain }
    }

    /// Run every case in order.
    ///
    /// Failures are collected and the run continues, unless `fail_fast` is
    /// set. A fatal outcome always stops the run immediately.
    pub fn run(&mut self, out: &mut dyn Write, diag: &mut dyn Write, fail_fast: bool) -> SuiteReport {
        let mut report = SuiteReport::default();
        for case in &mut self.cases {
            let outcome = case.run(out, diag);
            report.executed += 1;
            match outcome {
                CaseOutcome::Passed => report.passed += 1,
                CaseOutcome::Failed { message } => {
                    report.failures.push(CaseFailure {
                        case: case.name().to_string(),
                        message,
                    });
                    if fail_fast {
                        break;
                    }
                }
                CaseOutcome::Fatal(fatal) => {
                    report.fatal = Some(fatal);
                    break;
                }
            }
        }
        report
    }
}

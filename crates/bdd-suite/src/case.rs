//! The feature case adapter.
//!
//! A [`FeatureCase`] wraps one application's feature directories as a single
//! suite case. Each run builds a fresh [`RunConfig`] from the case options
//! and the live server URL, invokes the engine, and maps the engine's result
//! onto [`CaseOutcome`]: parse and configuration errors become fatal
//! outcomes the suite runner stops on; scenario failures are ordinary case
//! failures.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;

use crate::config::{CaseOptions, RunConfig};
use crate::engine::{BddEngine, EngineError, RunSummary};
use crate::server::ServerLifecycle;
use crate::snippets::snippet_block;
use crate::suite::{CaseOutcome, FatalError, SuiteCase};

/// Suite case delegating one set of feature directories to a BDD engine.
pub struct FeatureCase {
    name: String,
    feature_dirs: Vec<Utf8PathBuf>,
    engine: Arc<dyn BddEngine>,
    server: Option<Box<dyn ServerLifecycle>>,
    options: CaseOptions,
    executed: bool,
}

impl FeatureCase {
    /// Create a case for the given feature directories.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        feature_dirs: Vec<Utf8PathBuf>,
        engine: Arc<dyn BddEngine>,
        options: CaseOptions,
    ) -> Self {
        Self {
            name: name.into(),
            feature_dirs,
            engine,
            server: None,
            options,
            executed: false,
        }
    }

    /// Attach a live server lifecycle, started before the engine runs and
    /// stopped afterwards.
    #[must_use]
    pub fn with_server(mut self, server: Box<dyn ServerLifecycle>) -> Self {
        self.server = Some(server);
        self
    }

    /// The feature directories this case executes.
    #[must_use]
    pub fn feature_dirs(&self) -> &[Utf8PathBuf] {
        &self.feature_dirs
    }

    fn describe_failure(summary: &RunSummary) -> String {
        if summary.undefined.is_empty() {
            format!("{} of {} scenario(s) failed", summary.failed, summary.scenarios)
        } else {
            format!(
                "{} of {} scenario(s) failed ({} undefined step(s))",
                summary.failed,
                summary.scenarios,
                summary.undefined.len()
            )
        }
    }

    fn run_engine(
        &self,
        server_url: Option<String>,
        out: &mut dyn Write,
        diag: &mut dyn Write,
    ) -> CaseOutcome {
        let config = match RunConfig::new(self.feature_dirs.clone()) {
            Ok(config) => config
                .with_formatter(self.options.formatter)
                .with_capture_output(self.options.capture_output)
                .with_show_snippets(self.options.show_snippets)
                .with_server_url(server_url),
            Err(err) => return CaseOutcome::Fatal(FatalError::config(err.to_string())),
        };

        let mut captured = Vec::new();
        let result = if config.capture_output() {
            self.engine.run(&config, &mut captured)
        } else {
            self.engine.run(&config, out)
        };

        let outcome = match result {
            Ok(summary) => {
                if config.show_snippets() {
                    if let Some(block) = snippet_block(&summary.undefined) {
                        if let Err(err) = diag.write_all(block.as_bytes()) {
                            log::warn!("failed to write undefined-step snippets: {err}");
                        }
                    }
                }
                if summary.passed() {
                    CaseOutcome::Passed
                } else {
                    CaseOutcome::Failed {
                        message: Self::describe_failure(&summary),
                    }
                }
            }
            Err(EngineError::Parse { path, message }) => {
                CaseOutcome::Fatal(FatalError::parse(format!("{path}: {message}")))
            }
            Err(EngineError::Config(message)) => CaseOutcome::Fatal(FatalError::config(message)),
            Err(EngineError::Io(err)) => CaseOutcome::Failed {
                message: format!("engine output error: {err}"),
            },
        };

        // Captured output is replayed only when something went wrong.
        if config.capture_output() && !matches!(outcome, CaseOutcome::Passed) {
            if let Err(err) = out.write_all(&captured) {
                log::warn!("failed to replay captured engine output: {err}");
            }
        }
        outcome
    }
}

impl SuiteCase for FeatureCase {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires_server(&self) -> bool {
        true
    }

    fn run(&mut self, out: &mut dyn Write, diag: &mut dyn Write) -> CaseOutcome {
        if self.executed {
            return CaseOutcome::Failed {
                message: "feature case was already executed".to_string(),
            };
        }
        self.executed = true;

        let server_url = match &mut self.server {
            Some(server) => match server.start() {
                Ok(url) => Some(url),
                Err(err) => {
                    return CaseOutcome::Failed {
                        message: format!("live server failed to start: {err}"),
                    };
                }
            },
            None => None,
        };

        let outcome = self.run_engine(server_url, out, diag);

        if let Some(server) = &mut self.server {
            server.stop();
        }
        outcome
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests assert on success paths")]
mod tests {
    use super::{FeatureCase, SuiteCase};
    use crate::config::{CaseOptions, RunConfig};
    use crate::engine::steps::StepKeyword;
    use crate::engine::{BddEngine, EngineError, RunSummary, UndefinedStep};
    use crate::snippets::ANSI_UNDEFINED;
    use crate::suite::{CaseOutcome, FatalKind};
    use camino::Utf8PathBuf;
    use std::io::Write;
    use std::sync::Arc;

    enum Script {
        Pass,
        Fail,
        Undefined,
        Parse,
        Config,
    }

    struct ScriptedEngine {
        script: Script,
        output: &'static str,
    }

    impl ScriptedEngine {
        fn new(script: Script) -> Arc<Self> {
            Arc::new(Self {
                script,
                output: "engine output line\n",
            })
        }
    }

    impl BddEngine for ScriptedEngine {
        fn run(&self, _config: &RunConfig, out: &mut dyn Write) -> Result<RunSummary, EngineError> {
            out.write_all(self.output.as_bytes())?;
            match self.script {
                Script::Pass => Ok(RunSummary {
                    scenarios: 2,
                    failed: 0,
                    undefined: Vec::new(),
                }),
                Script::Fail => Ok(RunSummary {
                    scenarios: 2,
                    failed: 1,
                    undefined: Vec::new(),
                }),
                Script::Undefined => Ok(RunSummary {
                    scenarios: 1,
                    failed: 1,
                    undefined: vec![
                        UndefinedStep {
                            keyword: StepKeyword::Given,
                            text: "a missing step".to_string(),
                        },
                        UndefinedStep {
                            keyword: StepKeyword::Given,
                            text: "a missing step".to_string(),
                        },
                    ],
                }),
                Script::Parse => Err(EngineError::Parse {
                    path: Utf8PathBuf::from("features/broken.feature"),
                    message: "unexpected token".to_string(),
                }),
                Script::Config => Err(EngineError::Config("no feature files".to_string())),
            }
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn case(script: Script, options: CaseOptions) -> FeatureCase {
        FeatureCase::new(
            "features:blog",
            vec![Utf8PathBuf::from("blog/features")],
            ScriptedEngine::new(script),
            options,
        )
    }

    fn run(case: &mut FeatureCase) -> (CaseOutcome, String, String) {
        let mut out = Vec::new();
        let mut diag = Vec::new();
        let outcome = case.run(&mut out, &mut diag);
        (
            outcome,
            String::from_utf8(out).expect("utf8 out"),
            String::from_utf8(diag).expect("utf8 diag"),
        )
    }

    #[test]
    fn passing_summary_yields_passed() {
        let mut case = case(Script::Pass, CaseOptions::default());
        let (outcome, out, diag) = run(&mut case);
        assert!(matches!(outcome, CaseOutcome::Passed));
        assert!(out.contains("engine output line"));
        assert!(diag.is_empty());
    }

    #[test]
    fn scenario_failures_yield_failed() {
        let mut case = case(Script::Fail, CaseOptions::default());
        let (outcome, _out, _diag) = run(&mut case);
        let CaseOutcome::Failed { message } = outcome else {
            panic!("expected a failed outcome");
        };
        assert!(message.contains("1 of 2 scenario(s) failed"));
    }

    #[test]
    fn parse_errors_escalate_to_fatal() {
        let mut case = case(Script::Parse, CaseOptions::default());
        let (outcome, _out, _diag) = run(&mut case);
        let CaseOutcome::Fatal(fatal) = outcome else {
            panic!("expected a fatal outcome");
        };
        assert_eq!(fatal.kind(), FatalKind::Parse);
        assert!(fatal.message().contains("unexpected token"));
    }

    #[test]
    fn config_errors_escalate_to_fatal() {
        let mut case = case(Script::Config, CaseOptions::default());
        let (outcome, _out, _diag) = run(&mut case);
        let CaseOutcome::Fatal(fatal) = outcome else {
            panic!("expected a fatal outcome");
        };
        assert_eq!(fatal.kind(), FatalKind::Config);
    }

    #[test]
    fn undefined_steps_emit_a_deduplicated_snippet_block() {
        let mut case = case(Script::Undefined, CaseOptions::default());
        let (outcome, _out, diag) = run(&mut case);
        assert!(matches!(outcome, CaseOutcome::Failed { .. }));
        assert!(diag.starts_with(ANSI_UNDEFINED));
        assert_eq!(diag.matches("a missing step").count(), 1);
    }

    #[test]
    fn snippets_can_be_disabled() {
        let options = CaseOptions {
            show_snippets: false,
            ..CaseOptions::default()
        };
        let mut case = case(Script::Undefined, options);
        let (_outcome, _out, diag) = run(&mut case);
        assert!(diag.is_empty());
    }

    #[test]
    fn captured_output_is_withheld_on_success() {
        let options = CaseOptions {
            capture_output: true,
            ..CaseOptions::default()
        };
        let mut case = case(Script::Pass, options);
        let (outcome, out, _diag) = run(&mut case);
        assert!(matches!(outcome, CaseOutcome::Passed));
        assert!(out.is_empty());
    }

    #[test]
    fn captured_output_is_replayed_on_failure() {
        let options = CaseOptions {
            capture_output: true,
            ..CaseOptions::default()
        };
        let mut case = case(Script::Fail, options);
        let (_outcome, out, _diag) = run(&mut case);
        assert!(out.contains("engine output line"));
    }

    #[test]
    fn snippet_write_failures_do_not_change_the_outcome() {
        let mut case = case(Script::Undefined, CaseOptions::default());
        let outcome = case.run(&mut Vec::<u8>::new(), &mut FailingWriter);
        assert!(matches!(outcome, CaseOutcome::Failed { .. }));
    }

    #[test]
    fn replay_write_failures_do_not_change_the_outcome() {
        let options = CaseOptions {
            capture_output: true,
            ..CaseOptions::default()
        };
        let mut case = case(Script::Fail, options);
        let outcome = case.run(&mut FailingWriter, &mut Vec::<u8>::new());
        let CaseOutcome::Failed { message } = outcome else {
            panic!("expected a failed outcome");
        };
        assert!(message.contains("1 of 2 scenario(s) failed"));
    }

    #[test]
    fn a_case_refuses_to_run_twice() {
        let mut case = case(Script::Pass, CaseOptions::default());
        let (first, _, _) = run(&mut case);
        assert!(matches!(first, CaseOutcome::Passed));
        let (second, _, _) = run(&mut case);
        let CaseOutcome::Failed { message } = second else {
            panic!("expected the second run to fail");
        };
        assert!(message.contains("already executed"));
    }
}

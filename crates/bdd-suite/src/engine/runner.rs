//! Reference engine backed by the `gherkin` parser and the step registry.
//!
//! Matching is by exact keyword and text. All collected files are parsed
//! before any scenario runs, so a syntax error anywhere aborts the run with
//! nothing executed. Scenarios are pre-matched before execution: when any
//! step lacks a definition the scenario is not run and every unmatched step
//! is reported as undefined, mirroring engines that resolve step bindings
//! ahead of execution.

use std::ffi::OsStr;
use std::io::Write;

use camino::Utf8PathBuf;
use gherkin::{Feature, GherkinEnv, Scenario, Step};
use walkdir::WalkDir;

use super::steps::{StepContext, StepDef, StepKeyword, find_step};
use super::{BddEngine, EngineError, RunSummary, UndefinedStep};
use crate::config::{Formatter, RunConfig};

/// Engine that parses `.feature` files and executes registered steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct GherkinRunner;

impl BddEngine for GherkinRunner {
    fn run(&self, config: &RunConfig, out: &mut dyn Write) -> Result<RunSummary, EngineError> {
        let files = collect_feature_files(config)?;
        let features = parse_features(&files)?;
        let mut summary = RunSummary::default();
        for feature in &features {
            run_feature(feature, config, out, &mut summary)?;
        }
        write_tally(out, &summary)?;
        Ok(summary)
    }
}

enum StepStatus {
    Passed,
    Failed(String),
    Undefined,
    Skipped,
}

struct StepReport {
    keyword: StepKeyword,
    text: String,
    status: StepStatus,
}

enum ScenarioStatus {
    Passed,
    Failed(String),
    Undefined(Vec<UndefinedStep>),
}

/// Collect every `.feature` file under the configured paths, sorted within
/// each path for deterministic execution order.
fn collect_feature_files(config: &RunConfig) -> Result<Vec<Utf8PathBuf>, EngineError> {
    let mut files = Vec::new();
    for root in config.feature_paths() {
        if !root.is_dir() {
            return Err(EngineError::Config(format!(
                "features path is not a directory: {root}"
            )));
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|err| EngineError::Io(std::io::Error::other(err)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension() != Some(OsStr::new("feature")) {
                continue;
            }
            let path = Utf8PathBuf::try_from(entry.into_path())
                .map_err(|err| EngineError::Config(format!("non-UTF-8 feature path: {err}")))?;
            files.push(path);
        }
    }
    if files.is_empty() {
        let listed = config
            .feature_paths()
            .iter()
            .map(|path| path.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(EngineError::Config(format!("no feature files in {listed}")));
    }
    Ok(files)
}

/// Every file is parsed before any scenario runs; a syntax error in any file
/// aborts the run with nothing executed.
fn parse_features(files: &[Utf8PathBuf]) -> Result<Vec<Feature>, EngineError> {
    files
        .iter()
        .map(|file| {
            Feature::parse_path(file.as_std_path(), GherkinEnv::default()).map_err(|err| {
                EngineError::Parse {
                    path: file.clone(),
                    message: err.to_string(),
                }
            })
        })
        .collect()
}

fn run_feature(
    feature: &Feature,
    config: &RunConfig,
    out: &mut dyn Write,
    summary: &mut RunSummary,
) -> Result<(), EngineError> {
    if config.formatter() == Formatter::Pretty {
        writeln!(out)?;
        writeln!(out, "Feature: {}", feature.name)?;
    }
    for scenario in &feature.scenarios {
        summary.scenarios += 1;
        let (reports, status) = run_scenario(feature, scenario, config);
        match config.formatter() {
            Formatter::Pretty => write_pretty(out, scenario, &reports)?,
            Formatter::Plain => write_plain(out, &feature.name, scenario, &status)?,
        }
        match status {
            ScenarioStatus::Passed => {}
            ScenarioStatus::Failed(_) => summary.failed += 1,
            ScenarioStatus::Undefined(steps) => {
                summary.failed += 1;
                summary.undefined.extend(steps);
            }
        }
    }
    Ok(())
}

/// Background steps run before the scenario's own steps, per scenario.
fn scenario_steps<'a>(feature: &'a Feature, scenario: &'a Scenario) -> Vec<&'a Step> {
    feature
        .background
        .iter()
        .flat_map(|background| background.steps.iter())
        .chain(scenario.steps.iter())
        .collect()
}

fn run_scenario(
    feature: &Feature,
    scenario: &Scenario,
    config: &RunConfig,
) -> (Vec<StepReport>, ScenarioStatus) {
    let resolved: Vec<(StepKeyword, &str, Option<&'static StepDef>)> =
        scenario_steps(feature, scenario)
            .into_iter()
            .map(|step| {
                let keyword = StepKeyword::from(step.ty);
                (keyword, step.value.as_str(), find_step(keyword, &step.value))
            })
            .collect();

    let undefined: Vec<UndefinedStep> = resolved
        .iter()
        .filter(|(_, _, def)| def.is_none())
        .map(|(keyword, text, _)| UndefinedStep {
            keyword: *keyword,
            text: (*text).to_string(),
        })
        .collect();
    if !undefined.is_empty() {
        let reports = resolved
            .into_iter()
            .map(|(keyword, text, def)| StepReport {
                keyword,
                text: text.to_string(),
                status: if def.is_none() {
                    StepStatus::Undefined
                } else {
                    StepStatus::Skipped
                },
            })
            .collect();
        return (reports, ScenarioStatus::Undefined(undefined));
    }

    let mut ctx = StepContext::new(config.server_url().map(str::to_string));
    let mut reports = Vec::with_capacity(resolved.len());
    let mut failure: Option<String> = None;
    for (keyword, text, def) in resolved {
        if failure.is_some() {
            reports.push(StepReport {
                keyword,
                text: text.to_string(),
                status: StepStatus::Skipped,
            });
            continue;
        }
        let Some(def) = def else { continue };
        let status = match (def.run)(&mut ctx) {
            Ok(()) => StepStatus::Passed,
            Err(err) => {
                failure = Some(format!("{keyword} {text}: {err}"));
                StepStatus::Failed(err.to_string())
            }
        };
        reports.push(StepReport {
            keyword,
            text: text.to_string(),
            status,
        });
    }

    let status = failure.map_or(ScenarioStatus::Passed, ScenarioStatus::Failed);
    (reports, status)
}

fn write_pretty(
    out: &mut dyn Write,
    scenario: &Scenario,
    reports: &[StepReport],
) -> Result<(), EngineError> {
    writeln!(out, "  Scenario: {}", scenario.name)?;
    for report in reports {
        let status = match &report.status {
            StepStatus::Passed => "ok".to_string(),
            StepStatus::Failed(message) => format!("FAILED: {message}"),
            StepStatus::Undefined => "undefined".to_string(),
            StepStatus::Skipped => "skipped".to_string(),
        };
        writeln!(out, "    {} {} ... {status}", report.keyword, report.text)?;
    }
    Ok(())
}

fn write_plain(
    out: &mut dyn Write,
    feature_name: &str,
    scenario: &Scenario,
    status: &ScenarioStatus,
) -> Result<(), EngineError> {
    match status {
        ScenarioStatus::Passed => writeln!(out, "ok {feature_name} :: {}", scenario.name)?,
        ScenarioStatus::Failed(message) => {
            writeln!(out, "failed {feature_name} :: {}: {message}", scenario.name)?;
        }
        ScenarioStatus::Undefined(_) => {
            writeln!(out, "undefined {feature_name} :: {}", scenario.name)?;
        }
    }
    Ok(())
}

fn write_tally(out: &mut dyn Write, summary: &RunSummary) -> Result<(), EngineError> {
    writeln!(
        out,
        "{} scenario(s), {} failed, {} undefined step(s)",
        summary.scenarios,
        summary.failed,
        summary.undefined.len()
    )?;
    Ok(())
}

//! Behaviour-driven feature suites integrated into an application test
//! harness.
//!
//! Application modules opt into BDD coverage by carrying a `features`
//! directory of Gherkin `.feature` files. This crate discovers those
//! directories, wraps each one in a suite-compatible [`FeatureCase`],
//! delegates execution to a [`BddEngine`], and merges the resulting cases
//! with the host harness's own suite via the [`builder`] types.
//!
//! The host harness, the application registry, and the full step-matching
//! engine are external collaborators represented as trait seams
//! ([`HostSuite`], [`AppRegistry`], and [`BddEngine`] respectively).
//! [`GherkinRunner`] is a reference engine with exact keyword-and-text step
//! matching so the integration contract can be exercised end to end.

pub mod apps;
pub mod builder;
pub mod case;
pub mod config;
pub mod engine;
pub mod locate;
pub mod server;
pub mod snippets;
pub mod suite;

pub use apps::{AppModule, AppRegistry, DirectoryRegistry, RegistryError};
pub use builder::{BuildError, EmptyHost, FeaturesOnlySuiteBuilder, HostSuite, SuiteBuilder};
pub use case::FeatureCase;
pub use config::{CaseOptions, ConfigError, Formatter, RunConfig};
pub use engine::steps::{
    StepContext, StepDef, StepError, StepFn, StepKeyword, find_step,
};
pub use engine::{BddEngine, EngineError, GherkinRunner, RunSummary, UndefinedStep};
pub use server::{LoopbackServer, ServerError, ServerLifecycle};
pub use snippets::{ANSI_RESET, ANSI_UNDEFINED, snippet_block};
pub use suite::{CaseFailure, CaseOutcome, FatalError, FatalKind, Suite, SuiteCase, SuiteReport};

#[doc(hidden)]
pub use inventory::submit;

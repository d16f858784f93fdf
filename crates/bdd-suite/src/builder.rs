//! Suite builders merging host cases with discovered feature cases.
//!
//! The standard builder asks the host harness for its own suite, then
//! appends one [`FeatureCase`] per labelled application that carries a
//! `features` directory. The features-only builder skips the host suite and
//! defaults to every registered application when no labels are given. Labels
//! containing `.` use the host's sub-selection syntax, which feature cases
//! do not support; they are skipped with a warning rather than failing the
//! build.

use std::sync::Arc;

use thiserror::Error;

use crate::apps::{AppModule, AppRegistry, RegistryError};
use crate::case::FeatureCase;
use crate::config::CaseOptions;
use crate::engine::BddEngine;
use crate::locate::features_dir;
use crate::server::ServerLifecycle;
use crate::suite::{Suite, SuiteCase};

/// Factory producing a fresh server lifecycle per feature case.
pub type ServerFactory = Box<dyn Fn() -> Box<dyn ServerLifecycle>>;

/// Errors raised while building a suite.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A label failed to resolve against the application registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The host harness's own suite construction, consumed as-is.
pub trait HostSuite {
    /// Build the host's cases for the given labels.
    fn build(&self, labels: &[String]) -> Vec<Box<dyn SuiteCase>>;
}

/// Host seam that contributes no cases of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyHost;

impl HostSuite for EmptyHost {
    fn build(&self, _labels: &[String]) -> Vec<Box<dyn SuiteCase>> {
        Vec::new()
    }
}

/// Shared wiring for both builders.
struct FeatureWiring {
    registry: Box<dyn AppRegistry>,
    engine: Arc<dyn BddEngine>,
    options: CaseOptions,
    server_factory: Option<ServerFactory>,
}

impl FeatureWiring {
    /// Append a feature case for `app` when it carries a features directory.
    fn append_app(&self, suite: &mut Suite, app: &AppModule) {
        let Some(dir) = features_dir(app.dir()) else {
            return;
        };
        let mut case = FeatureCase::new(
            format!("features:{}", app.label()),
            vec![dir],
            Arc::clone(&self.engine),
            self.options,
        );
        if let Some(factory) = &self.server_factory {
            case = case.with_server(factory());
        }
        suite.push(Box::new(case));
    }

    /// Resolve each plain label and append its feature case. Labels using
    /// the host's sub-selector syntax are skipped with a warning.
    fn append_labels(&self, suite: &mut Suite, labels: &[String]) -> Result<(), BuildError> {
        for label in labels {
            if label.contains('.') {
                log::warn!("ignoring label with sub-selector: {label}");
                continue;
            }
            let app = self.registry.resolve(label)?;
            self.append_app(suite, &app);
        }
        Ok(())
    }
}

/// Builder producing the host suite plus feature cases for explicit labels.
pub struct SuiteBuilder {
    host: Box<dyn HostSuite>,
    wiring: FeatureWiring,
    fail_fast: bool,
}

impl SuiteBuilder {
    /// Create a builder over a registry, a host suite, and an engine.
    #[must_use]
    pub fn new(
        registry: Box<dyn AppRegistry>,
        host: Box<dyn HostSuite>,
        engine: Arc<dyn BddEngine>,
    ) -> Self {
        Self {
            host,
            wiring: FeatureWiring {
                registry,
                engine,
                options: CaseOptions::default(),
                server_factory: None,
            },
            fail_fast: false,
        }
    }

    /// Set the options applied to every feature case.
    #[must_use]
    pub fn with_options(mut self, options: CaseOptions) -> Self {
        self.wiring.options = options;
        self
    }

    /// Provide a server lifecycle factory for feature cases.
    #[must_use]
    pub fn with_server_factory(mut self, factory: ServerFactory) -> Self {
        self.wiring.server_factory = Some(factory);
        self
    }

    /// Stop the run at the first failing case instead of collecting
    /// failures.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Whether the built suite should stop at the first failure.
    #[must_use]
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Build the combined, reordered suite for the given labels.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a plain label fails to resolve.
    pub fn build(&self, labels: &[String]) -> Result<Suite, BuildError> {
        let mut suite = Suite::new();
        for case in self.host.build(labels) {
            suite.push(case);
        }
        self.wiring.append_labels(&mut suite, labels)?;
        Ok(suite.reorder())
    }
}

/// Builder producing feature cases only, with no host suite.
///
/// An empty label list selects every registered application.
pub struct FeaturesOnlySuiteBuilder {
    wiring: FeatureWiring,
    fail_fast: bool,
}

impl FeaturesOnlySuiteBuilder {
    /// Create a builder over a registry and an engine.
    #[must_use]
    pub fn new(registry: Box<dyn AppRegistry>, engine: Arc<dyn BddEngine>) -> Self {
        Self {
            wiring: FeatureWiring {
                registry,
                engine,
                options: CaseOptions::default(),
                server_factory: None,
            },
            fail_fast: false,
        }
    }

    /// Set the options applied to every feature case.
    #[must_use]
    pub fn with_options(mut self, options: CaseOptions) -> Self {
        self.wiring.options = options;
        self
    }

    /// Provide a server lifecycle factory for feature cases.
    #[must_use]
    pub fn with_server_factory(mut self, factory: ServerFactory) -> Self {
        self.wiring.server_factory = Some(factory);
        self
    }

    /// Stop the run at the first failing case instead of collecting
    /// failures.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Whether the built suite should stop at the first failure.
    #[must_use]
    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Build the reordered feature suite for the given labels, or for every
    /// registered application when `labels` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a plain label fails to resolve.
    pub fn build(&self, labels: &[String]) -> Result<Suite, BuildError> {
        let mut suite = Suite::new();
        if labels.is_empty() {
            for app in self.wiring.registry.all() {
                self.wiring.append_app(&mut suite, &app);
            }
        } else {
            self.wiring.append_labels(&mut suite, labels)?;
        }
        Ok(suite.reorder())
    }
}

//! Per-case run configuration.
//!
//! A [`RunConfig`] is built fresh for every case run and handed to the engine
//! as an explicit value; no ambient process state (environment, argument
//! list) is consulted or mutated. Validation happens at construction so the
//! engine can rely on the invariants.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Output formatting choice for scenario execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Formatter {
    /// Feature, scenario, and step lines with per-step status.
    #[default]
    Pretty,
    /// One line per scenario.
    Plain,
}

/// Options shared by every feature case a builder creates.
#[derive(Clone, Copy, Debug)]
pub struct CaseOptions {
    /// Output formatting choice.
    pub formatter: Formatter,
    /// Buffer engine output and replay it only when the case fails.
    pub capture_output: bool,
    /// Emit step-definition snippets for undefined steps.
    pub show_snippets: bool,
}

impl Default for CaseOptions {
    fn default() -> Self {
        Self {
            formatter: Formatter::Pretty,
            capture_output: false,
            show_snippets: true,
        }
    }
}

/// Errors raised when a [`RunConfig`] cannot be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration was built with no feature paths.
    #[error("at least one feature path is required")]
    EmptyPaths,
}

/// Validated configuration for one engine invocation.
#[derive(Clone, Debug)]
pub struct RunConfig {
    feature_paths: Vec<Utf8PathBuf>,
    formatter: Formatter,
    capture_output: bool,
    show_snippets: bool,
    server_url: Option<String>,
}

impl RunConfig {
    /// Create a configuration for the given feature directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPaths`] when `feature_paths` is empty.
    pub fn new(feature_paths: Vec<Utf8PathBuf>) -> Result<Self, ConfigError> {
        if feature_paths.is_empty() {
            return Err(ConfigError::EmptyPaths);
        }
        Ok(Self {
            feature_paths,
            formatter: Formatter::Pretty,
            capture_output: false,
            show_snippets: true,
            server_url: None,
        })
    }

    /// Select the output formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Control whether engine output is buffered until failure.
    #[must_use]
    pub fn with_capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Control whether undefined-step snippets are generated.
    #[must_use]
    pub fn with_show_snippets(mut self, show: bool) -> Self {
        self.show_snippets = show;
        self
    }

    /// Attach the live server URL steps may read during execution.
    #[must_use]
    pub fn with_server_url(mut self, url: Option<String>) -> Self {
        self.server_url = url;
        self
    }

    /// The feature directories to execute.
    #[must_use]
    pub fn feature_paths(&self) -> &[Utf8PathBuf] {
        &self.feature_paths
    }

    /// The selected output formatter.
    #[must_use]
    pub fn formatter(&self) -> Formatter {
        self.formatter
    }

    /// Whether engine output is buffered until failure.
    #[must_use]
    pub fn capture_output(&self) -> bool {
        self.capture_output
    }

    /// Whether undefined-step snippets are generated.
    #[must_use]
    pub fn show_snippets(&self) -> bool {
        self.show_snippets
    }

    /// The live server URL, when a server lifecycle is attached.
    #[must_use]
    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "tests assert on success and failure paths"
)]
mod tests {
    use super::{ConfigError, Formatter, RunConfig};
    use camino::Utf8PathBuf;

    #[test]
    fn rejects_empty_path_list() {
        assert_eq!(RunConfig::new(Vec::new()).unwrap_err(), ConfigError::EmptyPaths);
    }

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = RunConfig::new(vec![Utf8PathBuf::from("features")]).expect("config");
        assert_eq!(config.formatter(), Formatter::Pretty);
        assert!(!config.capture_output());
        assert!(config.show_snippets());
        assert_eq!(config.server_url(), None);
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = RunConfig::new(vec![Utf8PathBuf::from("features")])
            .expect("config")
            .with_formatter(Formatter::Plain)
            .with_capture_output(true)
            .with_show_snippets(false)
            .with_server_url(Some("http://127.0.0.1:0".to_string()));
        assert_eq!(config.formatter(), Formatter::Plain);
        assert!(config.capture_output());
        assert!(!config.show_snippets());
        assert_eq!(config.server_url(), Some("http://127.0.0.1:0"));
    }
}

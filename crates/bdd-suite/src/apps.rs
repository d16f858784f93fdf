//! Application registry seam.
//!
//! The host harness owns the authoritative mapping from labels to application
//! modules; this crate consumes it through [`AppRegistry`].
//! [`DirectoryRegistry`] is a filesystem-backed implementation that treats
//! each immediate subdirectory of a root as one application, which is enough
//! for the CLI and for tests.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// One application module known to the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppModule {
    label: String,
    dir: Utf8PathBuf,
}

impl AppModule {
    /// Create a module record from a label and its directory.
    #[must_use]
    pub fn new(label: impl Into<String>, dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            label: label.into(),
            dir: dir.into(),
        }
    }

    /// The label the host harness uses to select this application.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The application's base directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

/// Errors raised while resolving or enumerating applications.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The label does not name a registered application.
    #[error("unknown application label '{label}'")]
    UnknownLabel {
        /// The label that failed to resolve.
        label: String,
    },
    /// The application root could not be scanned.
    #[error("failed to scan application root {root}: {source}")]
    Scan {
        /// The root directory being scanned.
        root: Utf8PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

/// Resolves application labels and enumerates registered applications.
pub trait AppRegistry {
    /// Resolve one label to its application module.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownLabel`] when the label is not
    /// registered.
    fn resolve(&self, label: &str) -> Result<AppModule, RegistryError>;

    /// Enumerate every registered application, ordered by label.
    fn all(&self) -> Vec<AppModule>;
}

/// Registry backed by the immediate subdirectories of a root directory.
///
/// Hidden directories (names starting with `.`) are ignored. Each remaining
/// subdirectory becomes an application whose label is its directory name.
#[derive(Debug)]
pub struct DirectoryRegistry {
    apps: BTreeMap<String, Utf8PathBuf>,
}

impl DirectoryRegistry {
    /// Scan `root` and register each immediate subdirectory as an
    /// application.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Scan`] when the root or one of its entries
    /// cannot be read.
    pub fn discover(root: impl AsRef<Utf8Path>) -> Result<Self, RegistryError> {
        let root = root.as_ref();
        let scan_err = |source| RegistryError::Scan {
            root: root.to_path_buf(),
            source,
        };
        let mut apps = BTreeMap::new();
        for entry in root.read_dir_utf8().map_err(scan_err)? {
            let entry = entry.map_err(scan_err)?;
            if !entry.file_type().map_err(scan_err)?.is_dir() {
                continue;
            }
            let label = entry.file_name().to_string();
            if label.starts_with('.') {
                continue;
            }
            apps.insert(label, entry.into_path());
        }
        Ok(Self { apps })
    }
}

impl AppRegistry for DirectoryRegistry {
    fn resolve(&self, label: &str) -> Result<AppModule, RegistryError> {
        self.apps
            .get(label)
            .map(|dir| AppModule::new(label, dir.clone()))
            .ok_or_else(|| RegistryError::UnknownLabel {
                label: label.to_string(),
            })
    }

    fn all(&self) -> Vec<AppModule> {
        self.apps
            .iter()
            .map(|(label, dir)| AppModule::new(label.clone(), dir.clone()))
            .collect()
    }
}

//! App path resolution: from a bundle id or display name to the absolute
//! on-device executable path the argv upload needs.
//!
//! The on-device catalog service itself lives outside this crate; what is
//! fixed here is the interface and the matching rules: a query matches a
//! record's bundle id or display name, more than one match is an error,
//! and the result joins the install path with the executable name.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolves an app reference to an absolute on-device executable path.
pub trait AppResolver {
    fn resolve(&self, query: &str) -> Result<String, ResolveError>;
}

/// Errors from app path resolution. All of these are fatal and reported
/// before any connection to the monitoring service is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no app found with name or bundle id: {0}")]
    NotFound(String),

    #[error("ambiguous app name or bundle id: {0}")]
    Ambiguous(String),

    #[error("failed reading catalog {path}: {source}")]
    Catalog { path: PathBuf, source: io::Error },

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One installed-app record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRecord {
    pub bundle_id: String,
    pub display_name: String,
    /// App install directory on the device.
    pub path: String,
    /// Executable name inside the install directory.
    pub executable: String,
}

/// A file-backed catalog of installed apps.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    apps: Vec<AppRecord>,
}

impl Catalog {
    /// Load a catalog from a JSON file (an array of app records).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ResolveError::Catalog {
            path: path.to_path_buf(),
            source,
        })?;
        let apps: Vec<AppRecord> = serde_json::from_slice(&data)?;
        debug!(count = apps.len(), "catalog loaded");
        Ok(Self { apps })
    }

    pub fn from_records(apps: Vec<AppRecord>) -> Self {
        Self { apps }
    }

    pub fn records(&self) -> &[AppRecord] {
        &self.apps
    }
}

impl AppResolver for Catalog {
    fn resolve(&self, query: &str) -> Result<String, ResolveError> {
        let mut found: Option<&AppRecord> = None;
        for app in &self.apps {
            if app.bundle_id == query || app.display_name == query {
                if found.is_some() {
                    return Err(ResolveError::Ambiguous(query.to_string()));
                }
                found = Some(app);
            }
        }

        match found {
            Some(app) => Ok(format!(
                "{}/{}",
                app.path.trim_end_matches('/'),
                app.executable
            )),
            None => Err(ResolveError::NotFound(query.to_string())),
        }
    }
}

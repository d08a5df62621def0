//! Pretrained weight files and how to obtain them.

use crate::ModelError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Where a weights file lives locally and where to fetch it from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightsLocation {
    pub path: PathBuf,
    pub url: String,
}

impl WeightsLocation {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
        }
    }
}

/// Downloads a remote file to a local path.
pub trait Fetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ModelError>;
}

/// Fetcher backed by the `curl` command-line client.
///
/// Handles every scheme curl does, including the FTP server the default
/// weights are published on.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    program: String,
}

impl CurlFetcher {
    pub fn new() -> Self {
        Self::with_program("curl")
    }

    /// Use a specific curl binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ModelError> {
        debug!("Running {} for {}", self.program, url);
        let output = Command::new(&self.program)
            .args(["--fail", "--location", "--silent", "--show-error", "--create-dirs"])
            .arg("-o")
            .arg(dest)
            .arg(url)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ModelError::Download {
                url: url.to_string(),
                reason: format!("{} ({})", stderr.trim(), output.status),
            });
        }
        Ok(())
    }
}

/// Make sure the weights file exists locally, downloading it if needed.
#[tracing::instrument(skip_all, fields(path = %location.path.display()))]
pub fn ensure_weights(
    location: &WeightsLocation,
    fetcher: &dyn Fetcher,
) -> Result<PathBuf, ModelError> {
    if location.path.is_file() {
        debug!("Using cached weights");
        return Ok(location.path.clone());
    }

    info!("Downloading pretrained model from {}", location.url);
    if let Some(parent) = location.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fetcher.fetch(&location.url, &location.path)?;

    if !location.path.is_file() {
        return Err(ModelError::MissingWeights(location.path.clone()));
    }
    info!("Saved pretrained model to {}", location.path.display());
    Ok(location.path.clone())
}

//! Views read from the files of a single directory.

use crate::preprocess::preprocess;
use crate::source::{CaptureError, ViewImage, ViewSource};
use crate::PreprocessConfig;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Decodes every image file in a directory, in file-name order.
///
/// Files that cannot be opened or decoded are skipped with a warning.
#[derive(Debug)]
pub struct DirectorySource {
    dir: PathBuf,
    pending: VecDeque<PathBuf>,
    config: PreprocessConfig,
    limit: Option<usize>,
    produced: usize,
}

impl DirectorySource {
    /// List the regular files of `dir`, following symlinks. Subdirectories are
    /// ignored and entries that cannot be read are skipped with a warning.
    pub fn open(dir: impl AsRef<Path>, config: PreprocessConfig) -> Result<Self, CaptureError> {
        config.validate()?;
        let dir = dir.as_ref().to_path_buf();

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => files.push(path),
                Ok(_) => debug!("Ignoring {}", path.display()),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        files.sort();

        info!("Found {} candidate files in {}", files.len(), dir.display());
        Ok(Self {
            dir,
            pending: files.into(),
            config,
            limit: None,
            produced: 0,
        })
    }

    /// Stop after `max_views` views. Zero means no limit.
    pub fn with_limit(mut self, max_views: usize) -> Self {
        self.limit = (max_views > 0).then_some(max_views);
        self
    }

    fn exhausted(&self) -> bool {
        self.limit.is_some_and(|limit| self.produced >= limit)
    }
}

impl ViewSource for DirectorySource {
    fn next_view(&mut self) -> Result<Option<ViewImage>, CaptureError> {
        while !self.exhausted() {
            let Some(path) = self.pending.pop_front() else {
                return Ok(None);
            };
            debug!("Reading view {}", path.display());

            let decoded = match image::open(&path) {
                Ok(decoded) => decoded,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            debug!(
                "Decoded {}x{} {:?}",
                decoded.width(),
                decoded.height(),
                decoded.color()
            );

            let image = preprocess(&decoded, &self.config);
            let view = ViewImage::new(image, path, self.produced);
            self.produced += 1;
            return Ok(Some(view));
        }
        Ok(None)
    }

    fn len_hint(&self) -> Option<usize> {
        let remaining = self.pending.len();
        Some(match self.limit {
            Some(limit) => remaining.min(limit.saturating_sub(self.produced)),
            None => remaining,
        })
    }

    fn origin(&self) -> &Path {
        &self.dir
    }
}

//! Optional hand-off to an external mesh viewer.

use crate::errors::AppError;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, info, warn};

/// What happened when we tried to open the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerOutcome {
    /// The viewer ran and exited with this status.
    Exited(ExitStatus),
    /// The viewer command was not found.
    NotFound,
}

/// Resolve a command to an executable file.
///
/// Commands containing a path separator are checked as given; bare names are
/// searched for in `PATH`.
pub fn find_on_path(command: &str) -> Option<PathBuf> {
    if command.is_empty() {
        return None;
    }
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .flat_map(|dir| executable_names(command).map(move |name| dir.join(name)))
        .find(|path| is_executable(path))
}

fn executable_names(command: &str) -> impl Iterator<Item = String> + '_ {
    let windows_suffix = cfg!(windows).then(|| format!("{command}.exe"));
    std::iter::once(command.to_string()).chain(windows_suffix)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Open `file` in `command` and wait for the viewer to close.
pub fn open(command: &str, file: &Path) -> Result<ViewerOutcome, AppError> {
    let Some(program) = find_on_path(command) else {
        info!(
            "{} not found: please use a mesh viewer of your choice to view {}",
            command,
            file.display()
        );
        return Ok(ViewerOutcome::NotFound);
    };

    debug!("Launching {} {}", program.display(), file.display());
    let status = Command::new(&program).arg(file).status()?;
    if !status.success() {
        warn!("{} exited with {}", command, status);
    }
    Ok(ViewerOutcome::Exited(status))
}

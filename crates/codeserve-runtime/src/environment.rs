//! Resolution of [`EnvironmentFacts`] from the host.

use std::io;
use std::path::PathBuf;

use codeserve_common::types::EnvironmentFacts;
use nix::unistd::{User, getgid, getuid};

use crate::error::LaunchError;

/// Source of the facts a launch depends on.
pub trait EnvironmentProbe: Send + Sync {
    /// Resolves every fact, or fails naming the first one that could not be found.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::EnvironmentResolutionFailed`.
    fn resolve(&self) -> Result<EnvironmentFacts, LaunchError>;
}

/// Reads the facts of the current process and user.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostEnvironment;

impl EnvironmentProbe for HostEnvironment {
    fn resolve(&self) -> Result<EnvironmentFacts, LaunchError> {
        let cwd =
            std::env::current_dir().map_err(|e| LaunchError::environment("current directory", e))?;

        let uid = getuid();
        let gid = getgid();
        let user = User::from_uid(uid)
            .map_err(|errno| LaunchError::environment("current user", io::Error::from(errno)))?
            .ok_or_else(|| {
                LaunchError::environment(
                    "current user",
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("no passwd entry for uid {uid}"),
                    ),
                )
            })?;

        let home = home_dir(&user).ok_or_else(|| {
            LaunchError::environment(
                "user home directory",
                io::Error::new(io::ErrorKind::NotFound, "$HOME is not set"),
            )
        })?;

        let facts = EnvironmentFacts {
            cwd,
            uid: uid.as_raw(),
            gid: gid.as_raw(),
            username: user.name,
            home,
        };
        tracing::debug!(
            cwd = %facts.cwd.display(),
            user = %facts.username,
            uid = facts.uid,
            gid = facts.gid,
            "resolved environment"
        );
        Ok(facts)
    }
}

/// `$HOME`, falling back to the passwd entry.
fn home_dir(user: &User) -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(user.dir.clone()).filter(|dir| !dir.as_os_str().is_empty()))
}

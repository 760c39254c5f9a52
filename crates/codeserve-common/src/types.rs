//! Domain types describing the managed development container.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::LauncherConfig;
use crate::constants;

/// Snapshot of the invoking environment, resolved once per launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFacts {
    /// Current working directory of the process.
    pub cwd: PathBuf,
    /// Numeric user id of the invoking user.
    pub uid: u32,
    /// Numeric primary group id of the invoking user.
    pub gid: u32,
    /// Login name of the invoking user.
    pub username: String,
    /// Home directory of the invoking user.
    pub home: PathBuf,
}

/// Host path exposed inside the container, read-write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindMount {
    /// Path on the host.
    pub host: PathBuf,
    /// Path inside the container.
    pub container: String,
}

impl fmt::Display for BindMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host.display(), self.container)
    }
}

/// A TCP port published from the container to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortMapping {
    /// Port inside the container.
    pub container_port: u16,
    /// Port on the host.
    pub host_port: u16,
}

impl PortMapping {
    /// Engine key for the container side, e.g. `8080/tcp`.
    #[must_use]
    pub fn container_key(&self) -> String {
        format!("{}/tcp", self.container_port)
    }
}

/// Declarative description of the container submitted to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Stable container name.
    pub name: String,
    /// Image reference, pinned by digest.
    pub image: String,
    /// Process identity as `uid:gid`.
    pub user: String,
    /// Startup arguments.
    pub args: Vec<String>,
    /// Environment variables as `(key, value)` pairs.
    pub env: Vec<(String, String)>,
    /// Bind mounts.
    pub binds: Vec<BindMount>,
    /// The exposed and published port.
    pub port: PortMapping,
}

impl ContainerSpec {
    /// Assembles the specification from the environment and configuration.
    ///
    /// The name, image, startup flags and container port are constants; only
    /// the identity, mounts and host port depend on the inputs.
    #[must_use]
    pub fn assemble(facts: &EnvironmentFacts, config: &LauncherConfig) -> Self {
        Self {
            name: constants::CONTAINER_NAME.to_string(),
            image: constants::IMAGE.to_string(),
            user: format!("{}:{}", facts.uid, facts.gid),
            args: constants::STARTUP_FLAGS.iter().map(ToString::to_string).collect(),
            env: vec![(constants::USER_ENV_KEY.to_string(), facts.username.clone())],
            binds: vec![
                BindMount {
                    host: join_lexically(&facts.cwd, &config.workspace_dir),
                    container: constants::APP_DIR.to_string(),
                },
                BindMount {
                    host: facts.home.join(constants::HOST_CONFIG_SUBDIR),
                    container: constants::CONTAINER_CONFIG_DIR.to_string(),
                },
            ],
            port: PortMapping {
                container_port: constants::CONTAINER_PORT,
                host_port: config.host_port,
            },
        }
    }

    /// Environment entries in `KEY=value` form.
    #[must_use]
    pub fn env_entries(&self) -> Vec<String> {
        self.env.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }

    /// Bind mounts in `host:container` form.
    #[must_use]
    pub fn bind_entries(&self) -> Vec<String> {
        self.binds.iter().map(ToString::to_string).collect()
    }
}

/// Joins `relative` onto `base`, dropping `.` and resolving `..` textually.
fn join_lexically(base: &Path, relative: &Path) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let _ = joined.pop();
            }
            other => joined.push(other),
        }
    }
    joined
}

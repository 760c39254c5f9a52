//! The launch sequence for the development container.

use codeserve_common::config::LauncherConfig;
use codeserve_common::constants::{CONTAINER_NAME, IMAGE};
use codeserve_common::types::ContainerSpec;
use codeserve_engine::{Connector, Engine, OutputSink, progress};

use crate::best_effort::BestEffort;
use crate::environment::{EnvironmentProbe, HostEnvironment};
use crate::error::{LaunchError, PullFailure};

/// Replaces any existing instance of the container with a fresh one.
///
/// Every call removes, pulls, creates and starts; a previous container is
/// never reused, whatever state it was left in.
#[derive(Debug)]
pub struct Supervisor<C, P = HostEnvironment> {
    connector: C,
    probe: P,
    config: LauncherConfig,
}

impl<C: Connector> Supervisor<C> {
    /// Creates a supervisor that reads facts from the current process.
    pub const fn new(connector: C, config: LauncherConfig) -> Self {
        Self::with_probe(connector, HostEnvironment, config)
    }
}

impl<C: Connector, P: EnvironmentProbe> Supervisor<C, P> {
    /// Creates a supervisor with a custom environment probe.
    pub const fn with_probe(connector: C, probe: P, config: LauncherConfig) -> Self {
        Self {
            connector,
            probe,
            config,
        }
    }

    /// Returns the active configuration.
    pub const fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Ensures the container is running, writing pull progress to `sink`.
    ///
    /// Steps run strictly in order, and the first failure aborts the rest:
    /// resolve environment, connect, remove stale container (failure ignored),
    /// pull image, create, start.
    ///
    /// # Errors
    ///
    /// Returns the [`LaunchError`] variant naming the step that failed.
    pub fn ensure_running(&self, sink: &mut dyn OutputSink) -> Result<(), LaunchError> {
        let facts = self.probe.resolve()?;

        let engine = self
            .connector
            .connect()
            .map_err(|e| LaunchError::EngineUnavailable { source: e })?;

        remove_stale(&engine).discard();

        pull_image(&engine, sink)?;

        let spec = ContainerSpec::assemble(&facts, &self.config);
        let id = engine
            .create_container(&spec)
            .map_err(|e| LaunchError::ContainerCreateFailed {
                name: spec.name.clone(),
                source: e,
            })?;
        tracing::info!(id = %id, name = %spec.name, "container created");

        engine
            .start_container(&id)
            .map_err(|e| LaunchError::ContainerStartFailed {
                id: id.clone(),
                source: e,
            })?;
        tracing::info!(
            id = %id,
            name = %spec.name,
            host_port = spec.port.host_port,
            "container started"
        );
        Ok(())
    }

    /// Force-removes the container. A missing container is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is unavailable or refuses the removal.
    pub fn remove(&self) -> Result<(), LaunchError> {
        let engine = self
            .connector
            .connect()
            .map_err(|e| LaunchError::EngineUnavailable { source: e })?;

        match engine.remove_container(CONTAINER_NAME, true) {
            Ok(()) => {
                tracing::info!(name = CONTAINER_NAME, "container removed");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(name = CONTAINER_NAME, "no container to remove");
                Ok(())
            }
            Err(e) => Err(LaunchError::ContainerRemoveFailed {
                name: CONTAINER_NAME.to_string(),
                source: e,
            }),
        }
    }
}

/// Force-removes any container holding the fixed name.
///
/// The usual failure is that no such container exists, so callers discard
/// the outcome.
pub fn remove_stale<E: Engine>(engine: &E) -> BestEffort<()> {
    BestEffort::attempt("remove stale container", || {
        engine.remove_container(CONTAINER_NAME, true)
    })
}

/// Pulls the pinned image, streaming progress to `sink`.
///
/// The progress stream is dropped before this returns.
///
/// # Errors
///
/// Returns `LaunchError::ImagePullFailed`.
pub fn pull_image<E: Engine>(engine: &E, sink: &mut dyn OutputSink) -> Result<(), LaunchError> {
    tracing::info!(image = IMAGE, "pulling image");
    let failed = |source: PullFailure| LaunchError::ImagePullFailed {
        image: IMAGE.to_string(),
        source,
    };

    let stream = engine
        .pull_image(IMAGE)
        .map_err(|e| failed(PullFailure::Initiate(e)))?;
    let events = progress::report(stream, sink).map_err(|e| failed(e.into()))?;
    tracing::debug!(events, "image pull complete");
    Ok(())
}

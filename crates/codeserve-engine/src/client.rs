//! Container engine abstraction.

use codeserve_common::types::ContainerSpec;

use crate::error::EngineError;
use crate::event::PullEvent;

/// Blocking stream of image-pull events.
///
/// Dropping the stream releases the underlying response body.
pub type PullStream = Box<dyn Iterator<Item = Result<PullEvent, EngineError>> + Send>;

/// Operations the launcher needs from a container engine.
///
/// All calls block until the engine has answered.
pub trait Engine {
    /// Removes the named container, killing it first when `force` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses or the container does not exist.
    fn remove_container(&self, name: &str, force: bool) -> Result<(), EngineError>;

    /// Starts pulling `reference` and returns its progress stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull cannot be initiated.
    fn pull_image(&self, reference: &str) -> Result<PullStream, EngineError>;

    /// Creates a container from `spec`, returning the engine's container id.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses the specification, including
    /// when a container with the same name already exists.
    fn create_container(&self, spec: &ContainerSpec) -> Result<String, EngineError>;

    /// Starts a created container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be started.
    fn start_container(&self, id: &str) -> Result<(), EngineError>;
}

/// Produces engine handles from ambient configuration.
pub trait Connector: Send + Sync {
    /// Engine handle type produced by this connector.
    type Engine: Engine;

    /// Connects to the engine and negotiates a shared API version.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is unreachable or the client cannot be built.
    fn connect(&self) -> Result<Self::Engine, EngineError>;
}

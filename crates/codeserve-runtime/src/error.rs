//! Launch failure taxonomy.
//!
//! Each variant names the lifecycle step that failed and carries the
//! underlying cause as its source.

use codeserve_common::error::ConfigError;
use codeserve_engine::{EngineError, ProgressError};
use thiserror::Error;

/// Failure of one step of the launch sequence.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The launcher configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fact about the invoking environment could not be resolved.
    #[error("can't resolve {fact}: {source}")]
    EnvironmentResolutionFailed {
        /// Which fact failed, e.g. `current directory`.
        fact: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// No engine handle could be obtained.
    #[error("container engine is not available: {source}")]
    EngineUnavailable {
        /// Underlying engine error.
        #[source]
        source: EngineError,
    },

    /// The image pull could not be initiated or did not complete.
    #[error("unable to pull image {image}: {source}")]
    ImagePullFailed {
        /// Image reference being pulled.
        image: String,
        /// Underlying failure.
        #[source]
        source: PullFailure,
    },

    /// The engine refused to create the container.
    #[error("unable to create container {name}: {source}")]
    ContainerCreateFailed {
        /// Container name.
        name: String,
        /// Underlying engine error.
        #[source]
        source: EngineError,
    },

    /// The engine could not start the created container.
    #[error("unable to start container {id}: {source}")]
    ContainerStartFailed {
        /// Engine container id.
        id: String,
        /// Underlying engine error.
        #[source]
        source: EngineError,
    },

    /// The engine could not remove the container.
    #[error("unable to remove container {name}: {source}")]
    ContainerRemoveFailed {
        /// Container name.
        name: String,
        /// Underlying engine error.
        #[source]
        source: EngineError,
    },
}

/// Why an image pull failed.
#[derive(Debug, Error)]
pub enum PullFailure {
    /// The engine refused to begin the pull.
    #[error("cannot initiate pull: {0}")]
    Initiate(#[source] EngineError),

    /// The progress stream failed, including embedded per-layer errors.
    #[error(transparent)]
    Stream(#[from] ProgressError),
}

impl LaunchError {
    /// Wraps an OS error raised while resolving `fact`.
    pub(crate) const fn environment(fact: &'static str, source: std::io::Error) -> Self {
        Self::EnvironmentResolutionFailed { fact, source }
    }
}

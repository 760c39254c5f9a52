//! Engine and progress-stream error types.

use thiserror::Error;

/// Failure talking to the container engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The client could not be constructed from the ambient configuration.
    #[error("cannot construct engine client: {source}")]
    Connect {
        /// Underlying client error.
        #[source]
        source: bollard::errors::Error,
    },

    /// The engine could not be reached to negotiate an API version.
    #[error("cannot negotiate engine API version: {source}")]
    Negotiate {
        /// Underlying client error.
        #[source]
        source: bollard::errors::Error,
    },

    /// The local I/O runtime driving engine requests could not start.
    #[error("cannot start engine I/O runtime: {source}")]
    Runtime {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A request to the engine failed.
    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),

    /// The engine refused an operation.
    #[error("engine rejected the request: {message}")]
    Rejected {
        /// Message reported by the engine.
        message: String,
    },

    /// The engine reported an error inside a streamed response.
    #[error("engine reported a stream error: {message}")]
    Stream {
        /// Message reported by the engine.
        message: String,
    },

    /// A streamed event could not be decoded.
    #[error("cannot decode engine event: {detail}")]
    MalformedEvent {
        /// Decoder diagnostics.
        detail: String,
    },
}

impl EngineError {
    /// Sorts a client error raised while reading a stream into the matching variant.
    #[must_use]
    pub fn classify(error: bollard::errors::Error) -> Self {
        use bollard::errors::Error as E;
        match error {
            E::DockerStreamError { error } => Self::Stream { message: error },
            E::JsonDataError { message, .. } => Self::MalformedEvent { detail: message },
            E::JsonSerdeError { err } => Self::MalformedEvent {
                detail: err.to_string(),
            },
            other => Self::Docker(other),
        }
    }

    /// Returns whether the engine answered that the target does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Docker(bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                ..
            })
        )
    }
}

/// Failure while rendering an image-pull stream.
#[derive(Debug, Error)]
pub enum ProgressError {
    /// An event in the stream could not be decoded.
    #[error("malformed progress stream: {detail}")]
    MalformedStream {
        /// Decoder diagnostics.
        detail: String,
    },

    /// The engine embedded an error object in the stream.
    #[error("pull failed{}: {message}", layer_label(.id))]
    LayerFailed {
        /// Layer the error refers to, if any.
        id: Option<String>,
        /// Message reported by the engine.
        message: String,
    },

    /// The stream ended with an engine or transport error.
    #[error("progress stream interrupted: {source}")]
    Transport {
        /// Underlying engine error.
        #[source]
        source: EngineError,
    },

    /// The output sink rejected a write.
    #[error("cannot write progress output: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

fn layer_label(id: &Option<String>) -> String {
    id.as_deref()
        .map_or_else(String::new, |id| format!(" for layer {id}"))
}

impl From<EngineError> for ProgressError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::MalformedEvent { detail } => Self::MalformedStream { detail },
            EngineError::Stream { message } => Self::LayerFailed { id: None, message },
            other => Self::Transport { source: other },
        }
    }
}

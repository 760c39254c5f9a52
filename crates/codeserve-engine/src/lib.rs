//! # codeserve-engine
//!
//! Access to the local container engine for the codeserve launcher.
//!
//! Handles:
//! - **Client**: the [`Connector`] / [`Engine`] seam and its bollard-backed
//!   Docker implementation.
//! - **Events**: decoded image-pull progress events.
//! - **Sinks**: output targets with an explicit terminal capability query.
//! - **Progress**: rendering a pull stream as progress bars or a flat log.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod client;
pub mod docker;
pub mod error;
pub mod event;
pub mod progress;
pub mod sink;

pub use client::{Connector, Engine, PullStream};
pub use docker::{DockerConnector, DockerEngine};
pub use error::{EngineError, ProgressError};
pub use event::{ByteProgress, PullEvent};
pub use progress::{ProgressReporter, RenderMode};
pub use sink::{OutputSink, TerminalCapability};

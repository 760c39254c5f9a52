//! Container lifecycle management for the codeserve development container.
//!
//! [`start`] is the process-wide entry point: it runs the full
//! [`Supervisor`](supervisor::Supervisor) sequence at most once per process
//! and only logs failures. [`Launcher`](launcher::Launcher) offers the same
//! gating for a caller-supplied engine connector.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod best_effort;
pub mod environment;
pub mod error;
pub mod gate;
pub mod launcher;
pub mod supervisor;

pub use error::{LaunchError, PullFailure};
pub use launcher::{Launcher, launch_state, start};
pub use supervisor::Supervisor;

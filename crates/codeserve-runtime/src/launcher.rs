//! Gated entry points.
//!
//! Both [`start`] and [`Launcher::start`] run the launch sequence at most once
//! and never return its error: a failure is logged once, and later callers
//! simply see nothing further happen.

use std::io;
use std::sync::{Mutex, PoisonError};

use codeserve_common::config::LauncherConfig;
use codeserve_engine::{Connector, DockerConnector, OutputSink};

use crate::environment::{EnvironmentProbe, HostEnvironment};
use crate::error::LaunchError;
use crate::gate::{Gate, GateState};
use crate::supervisor::Supervisor;

static GATE: Gate = Gate::new();

/// Ensures the development container is running, once per process.
///
/// Reads its configuration from the environment, connects to the local Docker
/// engine, and writes pull progress to stdout. Safe to call from any number of
/// threads; concurrent callers block until the single launch has finished.
/// Must not be called from inside an async runtime.
pub fn start() {
    let _ = GATE.run_once(|| {
        if let Err(error) = launch_from_env() {
            tracing::error!(error = %error, "failed to start development container");
        }
    });
}

/// Returns the state of the gate behind [`start`].
pub fn launch_state() -> GateState {
    GATE.state()
}

fn launch_from_env() -> Result<(), LaunchError> {
    let config = LauncherConfig::from_env()?;
    launch(&Supervisor::new(DockerConnector, config))
}

// Stdout stays unlocked between writes so other threads can print while the
// engine is slow.
fn launch<C: Connector, P: EnvironmentProbe>(
    supervisor: &Supervisor<C, P>,
) -> Result<(), LaunchError> {
    supervisor.ensure_running(&mut io::stdout())
}

/// A [`Supervisor`] behind its own run-once gate.
pub struct Launcher<C, P = HostEnvironment> {
    supervisor: Supervisor<C, P>,
    gate: Gate,
    sink: Mutex<Box<dyn OutputSink + Send>>,
}

impl<C: Connector, P: EnvironmentProbe> Launcher<C, P> {
    /// Creates a launcher writing pull progress to stdout.
    pub fn new(supervisor: Supervisor<C, P>) -> Self {
        Self::with_sink(supervisor, Box::new(io::stdout()))
    }

    /// Creates a launcher writing pull progress to `sink`.
    pub fn with_sink(supervisor: Supervisor<C, P>, sink: Box<dyn OutputSink + Send>) -> Self {
        Self {
            supervisor,
            gate: Gate::new(),
            sink: Mutex::new(sink),
        }
    }

    /// Runs the launch sequence if this launcher has not run it yet.
    pub fn start(&self) {
        let _ = self.gate.run_once(|| {
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(error) = self.supervisor.ensure_running(&mut **sink) {
                tracing::error!(error = %error, "failed to start development container");
            }
        });
    }

    /// Returns the state of this launcher's gate.
    pub fn state(&self) -> GateState {
        self.gate.state()
    }

    /// Returns the wrapped supervisor.
    pub const fn supervisor(&self) -> &Supervisor<C, P> {
        &self.supervisor
    }
}

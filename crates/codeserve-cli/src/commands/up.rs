//! `codeserve up` — Ensure the development container is running.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use codeserve_common::config::LauncherConfig;
use codeserve_common::constants::{PORT_ENV, WORKSPACE_ENV};
use codeserve_engine::DockerConnector;
use codeserve_runtime::Supervisor;

/// Arguments for the `up` command.
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Host port published for the editor.
    #[arg(long, env = PORT_ENV)]
    pub port: Option<u16>,

    /// Directory mounted at /app, relative to the current directory.
    #[arg(long, env = WORKSPACE_ENV)]
    pub workspace: Option<PathBuf>,
}

/// Executes the `up` command.
///
/// Removes any previous container, pulls the image with progress on stdout,
/// then creates and starts a fresh container and prints its URL.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any launch step fails.
pub fn execute(args: UpArgs) -> anyhow::Result<()> {
    let base = LauncherConfig::from_env().context("invalid launcher configuration")?;
    let config = apply_flags(base, args).context("invalid launcher configuration")?;
    let port = config.host_port;
    announce(&config);

    Supervisor::new(DockerConnector, config)
        .ensure_running(&mut io::stdout())
        .context("failed to launch development container")?;

    println!("{}", url(port));
    Ok(())
}

fn announce(config: &LauncherConfig) {
    tracing::info!(
        port = config.host_port,
        workspace = %config.workspace_dir.display(),
        "launching development container"
    );
}

/// Overrides `config` with any flags given on the command line.
fn apply_flags(
    mut config: LauncherConfig,
    args: UpArgs,
) -> codeserve_common::error::Result<LauncherConfig> {
    if let Some(port) = args.port {
        config.host_port = port;
    }
    if let Some(workspace) = args.workspace {
        config.workspace_dir = workspace;
    }
    config.validate()?;
    Ok(config)
}

/// Browser URL of the editor published on `port`.
fn url(port: u16) -> String {
    format!("http://localhost:{port}")
}

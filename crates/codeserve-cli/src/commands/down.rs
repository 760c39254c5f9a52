//! `codeserve down` — Remove the development container.

use anyhow::Context;
use clap::Args;
use codeserve_common::config::LauncherConfig;
use codeserve_common::constants::CONTAINER_NAME;
use codeserve_engine::DockerConnector;
use codeserve_runtime::Supervisor;

/// Arguments for the `down` command.
#[derive(Args, Debug)]
pub struct DownArgs {}

/// Executes the `down` command.
///
/// # Errors
///
/// Returns an error if the engine is unavailable or refuses the removal.
pub fn execute(_args: DownArgs) -> anyhow::Result<()> {
    tracing::info!(name = CONTAINER_NAME, "removing development container");
    Supervisor::new(DockerConnector, LauncherConfig::default())
        .remove()
        .with_context(|| format!("failed to remove container {CONTAINER_NAME}"))?;
    println!("{CONTAINER_NAME} removed");
    Ok(())
}

//! Docker engine client backed by `bollard`.
//!
//! The bollard client is asynchronous; each [`DockerEngine`] owns a
//! current-thread tokio runtime and blocks on it, so callers see plain
//! blocking calls. Do not call these methods from inside another async runtime.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, RemoveContainerOptions, StartContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::{CreateImageInfo, HostConfig, PortBinding};
use codeserve_common::types::ContainerSpec;
use futures::{Stream, StreamExt};
use tokio::runtime::Runtime;

use crate::client::{Connector, Engine, PullStream};
use crate::error::EngineError;
use crate::event::PullEvent;

type ImageStream =
    Pin<Box<dyn Stream<Item = Result<CreateImageInfo, bollard::errors::Error>> + Send>>;

/// Connects to the engine named by `DOCKER_HOST`, or the platform default socket.
#[derive(Debug, Clone, Copy, Default)]
pub struct DockerConnector;

impl Connector for DockerConnector {
    type Engine = DockerEngine;

    fn connect(&self) -> Result<DockerEngine, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EngineError::Runtime { source: e })?;

        let docker = runtime.block_on(async {
            let docker =
                Docker::connect_with_defaults().map_err(|e| EngineError::Connect { source: e })?;
            docker
                .negotiate_version()
                .await
                .map_err(|e| EngineError::Negotiate { source: e })
        })?;

        tracing::debug!(api_version = %docker.client_version(), "connected to container engine");
        Ok(DockerEngine {
            docker,
            runtime: Arc::new(runtime),
        })
    }
}

/// Blocking handle to a Docker-compatible engine.
#[derive(Debug, Clone)]
pub struct DockerEngine {
    docker: Docker,
    runtime: Arc<Runtime>,
}

impl Engine for DockerEngine {
    fn remove_container(&self, name: &str, force: bool) -> Result<(), EngineError> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.runtime
            .block_on(self.docker.remove_container(name, Some(options)))?;
        tracing::debug!(name = %name, "container removed");
        Ok(())
    }

    fn pull_image(&self, reference: &str) -> Result<PullStream, EngineError> {
        let options = CreateImageOptions {
            from_image: reference.to_string(),
            ..Default::default()
        };
        let stream: ImageStream = Box::pin(self.docker.create_image(Some(options), None, None));
        Ok(Box::new(BlockingPull {
            runtime: Arc::clone(&self.runtime),
            stream,
        }))
    }

    fn create_container(&self, spec: &ContainerSpec) -> Result<String, EngineError> {
        let options = CreateContainerOptions {
            name: spec.name.clone(),
            platform: None,
        };
        let response = self
            .runtime
            .block_on(self.docker.create_container(Some(options), container_config(spec)))?;
        for warning in &response.warnings {
            tracing::warn!(name = %spec.name, warning = %warning, "engine warning on create");
        }
        Ok(response.id)
    }

    fn start_container(&self, id: &str) -> Result<(), EngineError> {
        self.runtime.block_on(
            self.docker
                .start_container(id, None::<StartContainerOptions<String>>),
        )?;
        Ok(())
    }
}

/// Translates a [`ContainerSpec`] into the engine's create request body.
fn container_config(spec: &ContainerSpec) -> Config<String> {
    let port_key = spec.port.container_key();
    let host_config = HostConfig {
        binds: Some(spec.bind_entries()),
        port_bindings: Some(HashMap::from([(
            port_key.clone(),
            Some(vec![PortBinding {
                host_ip: None,
                host_port: Some(spec.port.host_port.to_string()),
            }]),
        )])),
        ..Default::default()
    };

    Config {
        image: Some(spec.image.clone()),
        user: Some(spec.user.clone()),
        cmd: Some(spec.args.clone()),
        env: Some(spec.env_entries()),
        exposed_ports: Some(HashMap::from([(port_key, HashMap::new())])),
        host_config: Some(host_config),
        ..Default::default()
    }
}

/// Drives an async pull stream one event at a time on the engine's runtime.
struct BlockingPull {
    runtime: Arc<Runtime>,
    stream: ImageStream,
}

impl Iterator for BlockingPull {
    type Item = Result<PullEvent, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.runtime.block_on(self.stream.next())?;
        Some(item.map(PullEvent::from).map_err(EngineError::classify))
    }
}

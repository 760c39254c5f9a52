//! Fixed values surfaced to operators.

/// Image reference for the editor server, pinned by digest.
pub const IMAGE: &str = "codercom/code-server:4.9.1@sha256:e713ed9a211b4ef8be4ec01ce9003aeeed4e1981c563c224f42635feccb08800";

/// Name of the single managed container.
pub const CONTAINER_NAME: &str = "codeserve-vscode";

/// Port the editor server listens on inside the container.
pub const CONTAINER_PORT: u16 = 8080;

/// Default host port published for [`CONTAINER_PORT`].
pub const DEFAULT_HOST_PORT: u16 = 18080;

/// Startup flags passed to the editor server.
pub const STARTUP_FLAGS: [&str; 4] = [
    "--auth=none",
    "--disable-telemetry",
    "--disable-update-check",
    "--force",
];

/// Mount point of the workspace inside the container.
pub const APP_DIR: &str = "/app";

/// Mount point of the user configuration directory inside the container.
pub const CONTAINER_CONFIG_DIR: &str = "/home/coder/.config";

/// User configuration directory, relative to the home directory.
pub const HOST_CONFIG_SUBDIR: &str = ".config";

/// Environment variable carrying the invoking user's name into the container.
pub const USER_ENV_KEY: &str = "DOCKER_USER";

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_FILE_ENV: &str = "CODESERVE_CONFIG";

/// Environment variable overriding the published host port.
pub const PORT_ENV: &str = "CODESERVE_PORT";

/// Environment variable overriding the mounted workspace directory.
pub const WORKSPACE_ENV: &str = "CODESERVE_WORKSPACE";

/// Application name used in log output.
pub const APP_NAME: &str = "codeserve";

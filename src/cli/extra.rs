use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use chandl_common::config_dir;
use chandl_extractors::extractor_config::{
    serialize::{read_server_cfg_file, SERVER_CFG_FILE},
    ServerConfig, DEFAULT_SERVERS,
};
use log::debug;

use crate::error::CliError;

/// Builds the list of available servers: the built-in ones plus everything defined in
/// `config` (or `servers.toml` inside the config dir).
pub fn load_servers(config: Option<&Path>) -> Result<HashMap<String, ServerConfig>, CliError> {
    let mut servers = DEFAULT_SERVERS.clone();

    let cfg_path: PathBuf = match config {
        Some(path) => path.to_path_buf(),
        None => config_dir()?.join(SERVER_CFG_FILE),
    };

    debug!("Reading server config from {}", cfg_path.display());
    read_server_cfg_file(&cfg_path, &mut servers)?;

    Ok(servers)
}

pub fn select_server(
    servers: &HashMap<String, ServerConfig>,
    name: &str,
) -> Result<ServerConfig, CliError> {
    servers.get(name).cloned().ok_or_else(|| {
        let mut available: Vec<String> = servers.keys().cloned().collect();
        available.sort();
        CliError::ServerNotExists {
            name: name.to_string(),
            available,
        }
    })
}

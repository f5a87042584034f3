use chandl_common::{
    log::debug,
    serde::{self, Deserialize},
};
use std::{collections::HashMap, fs::read_to_string, io::Write};
use std::{fs::File, path::Path};

use super::{ServerConfig, CLIENT_UA_NAME, EXTRACTOR_UA_NAME};
use crate::error::ConfigError;

/// File name of the server definitions inside the config dir.
pub const SERVER_CFG_FILE: &str = "servers.toml";

const SAMPLE_SERVER_TOML: &str = include_str!("sample.toml");

#[derive(Debug, Deserialize)]
#[serde(crate = "self::serde")]
struct Config {
    #[serde(default)]
    servers: HashMap<String, Server>,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "self::serde")]
struct Server {
    pretty_name: String,
    api_url: String,
    image_url: String,
}

/// Reads additional server definitions from `path` into `smap`.
///
/// Entries with the same name as an existing one replace it. A commented sample file is
/// written to `path` if it doesn't exist yet.
pub fn read_server_cfg_file(
    path: &Path,
    smap: &mut HashMap<String, ServerConfig>,
) -> Result<(), ConfigError> {
    if !path.exists() {
        debug!("Writing sample server config to {}", path.display());
        let mut sample_toml = File::create(path)?;
        sample_toml.write_all(SAMPLE_SERVER_TOML.as_bytes())?;
    }

    let contents = read_to_string(path)?;

    let config: Config = toml::from_str(&contents)?;

    for (id, data) in config.servers {
        let config = ServerConfig {
            name: id.clone(),
            pretty_name: data.pretty_name,
            client_user_agent: format!("{}/{}", CLIENT_UA_NAME, env!("CARGO_PKG_VERSION")),
            extractor_user_agent: format!("{}/{}", EXTRACTOR_UA_NAME, env!("CARGO_PKG_VERSION")),
            api_url: data.api_url.trim_end_matches('/').to_string(),
            image_url: data.image_url.trim_end_matches('/').to_string(),
        };
        smap.insert(id, config);
    }

    debug!("Configured servers: {:?}", smap);
    Ok(())
}

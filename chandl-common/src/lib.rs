use std::{
    env,
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
};

// Public Exports
pub use chrono;
pub use directories;
pub use log;
pub use reqwest;
pub use serde;
pub use serde_json;

use directories::ProjectDirs;

use log::debug;

pub mod content;

/// Name of the environment variable that overrides [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "CHANDL_CONFIG_DIR";

/// Returns a `PathBuf` pointing to the directory where chandl keeps its configuration files.
///
/// This is XDG-compliant and resolves to `$XDG_CONFIG_HOME/chandl` on Linux or
/// `%APPDATA%/chandl/config` on Windows
///
/// Or you can set the env var `CHANDL_CONFIG_DIR` to point it to a custom location.
///
/// The directory is created if it doesn't exist yet.
pub fn config_dir() -> Result<PathBuf, io::Error> {
    let cfg_path = match env::var(CONFIG_DIR_ENV) {
        Ok(path) => PathBuf::from(path),
        Err(_) => ProjectDirs::from("org", "chandl", "chandl")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "unable to determine a home directory for the config files",
                )
            })?,
    };

    let cfold = Path::new(&cfg_path);

    if !cfold.exists() {
        debug!("Creating config dir at {}", cfold.display());
        create_dir_all(cfold)?;
    }

    Ok(cfold.to_path_buf())
}

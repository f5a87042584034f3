use std::io;

use chandl_extractors::error::ConfigError;
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to write input to console: {source}")]
    DialoguerIOFail {
        #[from]
        source: dialoguer::Error,
    },

    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to read server config: {source}")]
    ServerConfigReadFail {
        #[from]
        source: ConfigError,
    },

    #[error("Selected server {name} does not exist. Available servers are: {available:?}")]
    ServerNotExists {
        name: String,
        available: Vec<String>,
    },
}

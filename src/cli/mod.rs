use chandl_core::{generate_output_path, queue::QueueOpts};
use chandl_extractors::imageboards::fourchan::ThreadReference;
use std::path::PathBuf;

use clap::Parser;

pub mod extra;

#[derive(Parser, Debug)]
#[clap(name = "chandl", author, version, about, long_about = None)]
pub struct Cli {
    /// Urls of the threads to download
    ///
    /// Example: https://boards.4chan.org/g/thread/123456789
    #[clap(value_name = "URLS", required_unless_present = "servers")]
    pub urls: Vec<String>,

    /// Specify which server definition to download from
    #[clap(long, value_name = "NAME", default_value = "4chan", help_heading = "GENERAL")]
    pub server: String,

    /// Read server definitions from this file instead of the default `servers.toml`
    #[clap(long, value_name = "PATH", help_heading = "GENERAL")]
    pub config: Option<PathBuf>,

    /// Print all available servers and extractors, then exit
    #[clap(long, help_heading = "GENERAL")]
    pub servers: bool,

    /// Print every content found as a JSON line instead of downloading it
    #[clap(long, help_heading = "GENERAL")]
    pub list: bool,

    /// Where to save files (If the path doesn't exist, it will be created.)
    ///
    /// Defaults to `<current dir>/<board>/<thread id>`
    #[clap(short = 'o', long, value_name = "PATH", help_heading = "SAVE")]
    pub output: Option<PathBuf>,

    /// Number of simultaneous downloads
    ///
    /// [max: 20]
    #[clap(
        short = 'd',
        value_name = "NUMBER",
        value_parser(clap::value_parser!(u8).range(1..=20)),
        default_value_t = 5,
        help_heading = "DOWNLOAD"
    )]
    pub simultaneous_downloads: u8,

    /// Also download the thumbnail of every attachment
    #[clap(long, value_parser, default_value_t = false, help_heading = "SAVE")]
    pub thumbnails: bool,

    /// Write the post metadata in a json file next to each downloaded file
    #[clap(long, value_parser, default_value_t = false, help_heading = "SAVE")]
    pub metadata: bool,

    /// Always overwrite output
    #[clap(short = 'y', value_parser, default_value_t = false, help_heading = "SAVE")]
    pub overwrite: bool,
}

impl Cli {
    pub const fn queue_opts(&self) -> QueueOpts {
        QueueOpts {
            thumbnails: self.thumbnails,
            overwrite: self.overwrite,
            metadata: self.metadata,
        }
    }

    pub fn generate_save_path(&self, thread: &ThreadReference) -> Result<PathBuf, std::io::Error> {
        if let Some(output_path) = &self.output {
            return Ok(output_path.clone());
        }

        Ok(generate_output_path(&std::env::current_dir()?, thread))
    }
}

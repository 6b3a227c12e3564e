// Command line interface module
// Handles parsing of command line arguments and merging them into the config

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// image-viewer - A minimal image viewer with crop and rotate
#[derive(Parser, Debug)]
#[command(name = "image-viewer")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image file or directory to open on startup
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Directory the open dialogs start in
    #[arg(long, value_name = "DIR", env = "INITIAL_DIR")]
    pub initial_dir: Option<PathBuf>,

    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include images from subdirectories when opening a directory
    #[arg(short, long)]
    pub recursive: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Path of the config file to read
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::default_path)
    }

    /// Apply command line overrides on top of the file config
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.initial_dir {
            config.initial_dir = Some(dir.clone());
        }
        if self.recursive {
            config.recursive = true;
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}

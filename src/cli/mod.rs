use crate::materialize::{DEFAULT_LEB_SIZE, MaterializeOpts};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Sparse image stream, usually generated by mkfs.ubifs
    pub source: PathBuf,
    /// Flat image to create (truncated if it exists)
    pub dest: PathBuf,
    /// Logical erase block size in bytes
    #[arg(long, default_value_t = DEFAULT_LEB_SIZE)]
    pub leb_size: usize,
}

impl From<&Cli> for MaterializeOpts {
    fn from(cli: &Cli) -> Self {
        MaterializeOpts {
            leb_size: cli.leb_size,
        }
    }
}

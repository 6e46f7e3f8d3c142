mod cli;
mod errors;
mod logging;
pub mod materialize;

use clap::Parser;

fn main() -> color_eyre::Result<()> {
    crate::errors::init()?;
    crate::logging::init()?;
    let cli = cli::Cli::parse();
    let opts = materialize::MaterializeOpts::from(&cli);
    materialize::materialize_file(&cli.source, &cli.dest, &opts)?;
    Ok(())
}

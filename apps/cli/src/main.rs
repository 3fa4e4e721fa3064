//! apiref CLI: generates the API reference module consumed by the docs site.
//!
//! Reads the endpoint and object JSON under the data directory and writes a
//! CommonJS module with every endpoint grouped into its documentation section.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}

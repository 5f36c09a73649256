//! `dfx` command-line entry point.
//!
//! ```bash
//! dfx describe people.csv                       # table page
//! dfx describe people.csv --column age          # column page
//! dfx describe people.csv --relationship region state
//! dfx describe people.json --column id --kind ColumnId --brief
//! dfx cache keys
//! ```

#![expect(clippy::print_stdout, clippy::print_stderr)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    let config = dfx::config::load_config();

    if let Err(e) = dfx::logging::init(&config.log_filter) {
        eprintln!("Logging disabled: {e:#}");
    }

    cli::run_command(cli.command, &config)
}

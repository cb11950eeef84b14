//! Provides the main entry point to the program.
use anyhow::Result;
use human_panic::setup_panic;
use sosim::cli::run_cli;

fn main() -> Result<()> {
    setup_panic!();

    run_cli()
}

use anyhow::Result;
use clap::Parser;

use flowscan::runtime::{boot, cli::Cli, run};

fn main() -> Result<()> {
    let cli = Cli::parse();
    boot::init_logging(cli.quiet);
    let config = boot::boot(&cli)?;
    run::run(&cli, &config)
}

//! CLI entry point for smFISH dataset preparation

use clap::Parser;
use env_logger::{Builder, Env};
use spotprep::io::cli::{Cli, CommandRunner};

fn main() -> spotprep::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let runner = CommandRunner::new(cli);
    runner.run(&mut std::io::stdout().lock())
}

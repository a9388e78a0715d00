mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    // 初始化日志系统
    specreport::logger::init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Replay(args) => cli::run_replay(args)?,
    }
    Ok(())
}

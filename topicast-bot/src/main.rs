//! `topicast` binary: run the broadcast bot or check its tables.

use anyhow::Result;
use clap::Parser;
use topicast_bot::{check_report, load_tables, run_bot, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, config } => {
            let config = BotConfig::load(token, config)?;
            run_bot(config).await
        }
        Commands::Check { config } => {
            let tables = load_tables(config)?;
            print!("{}", check_report(&tables));
            Ok(())
        }
    }
}

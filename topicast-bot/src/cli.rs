//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "topicast")]
#[command(about = "Broadcast one message into a shared forum topic of several Telegram groups", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// Broadcast tables file; overrides BROADCAST_CONFIG.
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Validate the broadcast tables and print them without connecting to Telegram.
    Check {
        #[arg(short, long)]
        config: Option<String>,
    },
}

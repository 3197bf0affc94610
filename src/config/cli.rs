use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lawmate")]
#[command(about = "LawMate client: verified professionals lookup and legal chat")]
pub struct CliArgs {
    #[arg(long, global = true, help = "TOML config file (defaults to LAWMATE_* environment variables)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Request deadline in seconds, overrides config")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List verified professionals for a service
    Professionals {
        #[arg(long, default_value = "")]
        service: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(long, help = "Navigation query string, e.g. 'service=divorce-law&city=Pune'")]
        query: Option<String>,
    },

    /// Ask the legal assistant a question
    Chat {
        #[arg(long)]
        service: String,

        #[arg(long)]
        user: String,

        #[arg(long)]
        query: String,
    },

    /// Show prior chat history for a user
    History {
        #[arg(long)]
        service: String,

        #[arg(long)]
        user: String,
    },

    /// Submit a JSON form payload to the intake endpoint
    Submit {
        #[arg(long)]
        file: PathBuf,
    },

    /// Check that the chat backend is up
    Health,

    /// Look up a UI message
    Translate {
        #[arg(long)]
        locale: Option<String>,

        key: String,
    },
}

pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::cli::commands::seed::Fixtures;

#[derive(Parser)]
#[command(name = "webshop")]
#[command(about = "Web-shop REST API server and maintenance commands")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,

        #[command(flatten)]
        fixtures: Fixtures,
    },

    #[command(about = "Load user and product fixtures into the PostgreSQL store")]
    Seed {
        #[command(flatten)]
        fixtures: Fixtures,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        fixtures: Fixtures::default(),
    });

    match command {
        Commands::Serve { port, fixtures } => commands::serve::handle(port, fixtures).await,
        Commands::Seed { fixtures } => commands::seed::handle(fixtures, output_format).await,
    }
}

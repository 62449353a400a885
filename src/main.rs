use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// federation - bilingual federation website
#[derive(Parser)]
#[command(name = "federation")]
#[command(about = "Bilingual federation website with a verified contact form", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send one inquiry to a running server's contact endpoint
    Contact(cli::contact::ContactArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = federation::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    federation::observability::init_observability(
        "federation",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Contact(args) => cli::contact::send(config, args).await,
    }
}

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use colored::*;

use tasklist_cli::config::Config;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Tasklist - a single-user task list served over HTTP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve(ServeArgs),
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Address to bind (overrides TASKLIST_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// SQLite database file (overrides TASKLIST_DB_PATH)
    #[arg(long, value_name = "PATH", conflicts_with = "in_memory")]
    database: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();
    tasklist_cli::init_tracing();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve(ServeArgs::default()));

    if let Err(e) = handle_command(command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => {
            let config = Config::from_env()?.with_overrides(
                args.host.as_deref(),
                args.port,
                args.database,
                args.in_memory,
            )?;

            println!(
                "{} Serving tasks on {}",
                "✓".green(),
                format!("http://{}", config.socket_addr()).cyan()
            );

            tasklist_cli::run_server(config).await
        }
    }
}

mod advisor;
mod assistant;
mod categorizer;
mod chart;
mod cli;
mod db;
mod error;
mod fmt;
mod ledger;
mod llm;
mod models;
mod parser;
mod reports;
mod settings;
mod telegram;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use assistant::Command;
use cli::{Cli, Commands};
use reports::Window;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spendbot=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Run => cli::run::run().await,
        Commands::Add { text } => cli::add::run(&text).await,
        Commands::Stats { chart } => cli::report::run(Window::All, chart),
        Commands::Week { chart } => cli::report::run(Window::Week, chart),
        Commands::Month { chart } => cli::report::run(Window::Month, chart),
        Commands::Advice => cli::ask::run(Command::Advice).await,
        Commands::Forecast => cli::ask::run(Command::Forecast).await,
        Commands::Reset { yes } => cli::reset::run(yes),
        Commands::Status => cli::status::run(),
        Commands::Backup { output } => cli::backup::run(output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

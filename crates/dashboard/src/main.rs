//! threadlens command line entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use dashboard::cli::{Cli, Commands};
use dashboard::commands;
use dashboard::server::{startup::start_server, state::AppState};
use perspective::{Summarizer, SummarizerConfig};

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // Logs go to stderr so command output stays valid JSON
  let filter = if cli.verbose {
    EnvFilter::new("debug,hyper=info,reqwest=info,h2=info")
  } else {
    EnvFilter::new("threadlens=info,dashboard=info,ingest=info,perspective=info,tower_http=info,warn")
  };
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  let ingest = cli.ingest_config();
  let summarizer = Summarizer::from_config(SummarizerConfig::from_env());

  match cli.command {
    Commands::Posts { filters } => commands::list_posts(&ingest, &filters.into())?,
    Commands::Post { id } => commands::show_post(&ingest, &id)?,
    Commands::Perspective { grouped } => commands::show_perspective(&ingest, &summarizer, grouped).await?,
    Commands::Serve { bind } => start_server(bind, AppState::new(ingest, summarizer)).await?,
  }

  Ok(())
}

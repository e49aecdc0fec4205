use clap::{Args, Parser, Subcommand};
use ingest::config::CSV_PATH_ENV;
use ingest::{IngestConfig, PostQuery};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "threadlens")]
#[command(about = "threadlens - browse and summarize course discussion threads\nReads a thread CSV export and groups it by homework and model")]
#[command(version)]
pub struct Cli {
  /// Path to the thread CSV export
  #[arg(long, global = true, env = CSV_PATH_ENV)]
  pub csv: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

/// Filters for the post list
#[derive(Args, Debug, Default)]
pub struct PostFilters {
  /// Only posts carrying this exact tag, e.g. hw:3
  #[arg(long)]
  pub tag: Option<String>,
  /// Case-insensitive text search over title, body and author
  #[arg(long)]
  pub search: Option<String>,
  /// 1-based page number
  #[arg(long)]
  pub page: Option<usize>,
  /// Posts per page
  #[arg(long)]
  pub per_page: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print one page of posts as JSON
  Posts {
    #[command(flatten)]
    filters: PostFilters,
  },
  /// Print a single post as JSON
  Post {
    /// Post id (the thread_id column)
    id: String,
  },
  /// Print the overview, or the homework and model groups
  Perspective {
    /// Summarize per homework and per model instead of overall
    #[arg(short, long)]
    grouped: bool,
  },
  /// Serve the JSON API
  Serve {
    /// Server bind address
    #[arg(long, default_value = DEFAULT_BIND)]
    bind: SocketAddr,
  },
}

impl Cli {
  pub fn ingest_config(&self) -> IngestConfig {
    self.csv.clone().map(IngestConfig::new).unwrap_or_else(IngestConfig::from_env)
  }
}

impl From<PostFilters> for PostQuery {
  fn from(filters: PostFilters) -> Self {
    PostQuery { tag: filters.tag, search: filters.search, page: filters.page, per_page: filters.per_page }
  }
}

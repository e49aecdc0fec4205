//! Ingest - CSV export loading for threadlens
//!
//! Parses the discussion-thread CSV export, normalizes each row into a
//! [`Post`], and serves the filtered/paginated list views the dashboard shows.

pub mod config;
pub mod csv;
pub mod loader;
pub mod post;
pub mod query;

pub use config::IngestConfig;
pub use csv::parse_csv;
pub use loader::{load_post_by_id, load_posts, IngestError, PostLoad, PostLookup};
pub use post::Post;
pub use query::{query_posts, tag_counts, PostPage, PostQuery};

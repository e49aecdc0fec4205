//! Perspective building for the threadlens dashboard
//!
//! Turns normalized posts into an overview with themed clusters and into
//! homework and model groups. Summaries come from a remote chat model when a
//! credential is configured and from local heuristics otherwise.

pub mod cache;
pub mod client;
pub mod config;
pub mod grouping;
pub mod heuristic;
pub mod parse;
pub mod pool;
pub mod retry;
pub mod summarize;
pub mod types;

pub use cache::{cache_key, CachedSummary, LruSummaryCache, SummaryCache};
pub use client::{ChatClient, ChatCompletion, ChatError, ChatMessage, ChatRequest, OpenAiClient};
pub use config::SummarizerConfig;
pub use grouping::{group_posts, PostBucket, PostGroups};
pub use heuristic::{build_heuristic_grouped_perspective, build_heuristic_perspective};
pub use retry::{complete_with_retry, RetryPolicy};
pub use summarize::Summarizer;
pub use types::{AIPerspective, Cluster, GroupSummary, GroupedAIPerspective, PerspectiveMode, PostTakeaway};

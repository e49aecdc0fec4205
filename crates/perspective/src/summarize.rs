//! LLM-backed perspectives with heuristic fallback
//!
//! The [`Summarizer`] always has a complete heuristic answer to fall back on.
//! Remote calls only ever improve on it: a missing credential, a failed call
//! or an unusable reply leaves the heuristic content in place.

use ingest::Post;
use serde::Serialize;
use std::sync::Arc;

use crate::cache::{cache_key, CachedSummary, LruSummaryCache, SummaryCache};
use crate::client::{ChatClient, ChatError, ChatMessage, ChatRequest, OpenAiClient};
use crate::config::SummarizerConfig;
use crate::grouping::{group_posts, PostBucket};
use crate::heuristic::{
  build_heuristic_grouped_perspective, build_heuristic_perspective, collapse_whitespace, heuristic_grouped_from,
  heuristic_overview, heuristic_takeaway, truncate_chars, GROUP_POST_LIMIT,
};
use crate::parse::{parse_group_reply, parse_overview, GroupReply};
use crate::pool::run_bounded;
use crate::retry::complete_with_retry;
use crate::types::{AIPerspective, GroupSummary, GroupedAIPerspective, PerspectiveMode, PostTakeaway};

/// Posts sent for the ungrouped overview.
pub const OVERVIEW_SAMPLE_SIZE: usize = 24;
/// Body characters kept per post in the overview sample.
pub const OVERVIEW_BODY_CHARS: usize = 600;
/// Body characters kept per post in a group sample.
pub const GROUP_BODY_CHARS: usize = 400;
/// Longest takeaway accepted from a model reply.
pub const MAX_TAKEAWAY_CHARS: usize = 240;

const TEMPERATURE: f32 = 0.2;

pub const NO_CREDENTIAL_NOTE: &str = "No API key configured; showing heuristic summaries.";

const OVERVIEW_PURPOSE: &str = "overview";
const GROUP_PURPOSE: &str = "group";

const SYSTEM_PROMPT: &str = "You analyze course discussion threads about homework assignments and language models. \
  Be concise, concrete and factual. Never invent threads that are not in the sample.";

#[derive(Debug, Serialize)]
struct SamplePost {
  id: String,
  title: String,
  tags: Vec<String>,
  body: String,
}

#[derive(Debug, Serialize)]
struct OverviewInput {
  total: usize,
  posts: Vec<SamplePost>,
}

#[derive(Debug, Serialize)]
struct GroupInput {
  key: String,
  label: String,
  count: usize,
  posts: Vec<SamplePost>,
}

pub struct Summarizer {
  client: Option<Arc<dyn ChatClient>>,
  cache: Arc<dyn SummaryCache>,
  config: SummarizerConfig,
}

impl Summarizer {
  /// Build from configuration; an OpenAI client is created only when a credential is set.
  pub fn new(config: SummarizerConfig, cache: Arc<dyn SummaryCache>) -> Self {
    let client = config.api_key.as_deref().and_then(|key| match OpenAiClient::new(&config.base_url, key) {
      Ok(client) => Some(Arc::new(client) as Arc<dyn ChatClient>),
      Err(e) => {
        tracing::warn!("Remote summaries disabled: {e}");
        None
      }
    });

    Self { client, cache, config }
  }

  /// Build from configuration with a fresh LRU cache sized by the config.
  pub fn from_config(config: SummarizerConfig) -> Self {
    let cache = Arc::new(LruSummaryCache::new(config.cache_capacity));
    Self::new(config, cache)
  }

  /// Use a specific client regardless of the configured credential.
  pub fn with_client(config: SummarizerConfig, client: Arc<dyn ChatClient>, cache: Arc<dyn SummaryCache>) -> Self {
    Self { client: Some(client), cache, config }
  }

  pub fn config(&self) -> &SummarizerConfig {
    &self.config
  }

  pub fn remote_enabled(&self) -> bool {
    self.client.is_some()
  }

  /// Overview of all posts: summary text plus a handful of themed clusters.
  pub async fn build_ai_perspective(&self, posts: &[Post]) -> AIPerspective {
    if posts.is_empty() {
      return build_heuristic_perspective(posts, None);
    }

    let Some(client) = self.client.as_deref() else {
      return build_heuristic_perspective(posts, Some(NO_CREDENTIAL_NOTE));
    };

    let input = OverviewInput { total: posts.len(), posts: sample_posts(posts, OVERVIEW_SAMPLE_SIZE, OVERVIEW_BODY_CHARS) };
    let key = cache_key(OVERVIEW_PURPOSE, &self.config.model, &input);
    if let Some(CachedSummary::Perspective(cached)) = self.cache.get(&key) {
      tracing::debug!("Overview served from cache");
      return cached;
    }

    let request = self.request(overview_prompt(&input));
    match complete_with_retry(client, &request, &self.config.retry).await {
      Ok(completion) => {
        let parsed = parse_overview(&completion.content, posts.len());
        let note = parsed.clusters.is_fallback().then(|| "The model reply did not list themes in the expected format.".to_string());
        let summary = if parsed.summary.is_empty() {
          build_heuristic_perspective(posts, None).summary
        } else {
          parsed.summary
        };

        let perspective = AIPerspective {
          summary,
          clusters: parsed.clusters.into_clusters(),
          mode: PerspectiveMode::Llm,
          model_used: completion.model,
          note,
        };
        self.cache.set(key, CachedSummary::Perspective(perspective.clone()));
        tracing::info!("Built LLM overview for {} posts", posts.len());
        perspective
      }
      Err(e) => {
        tracing::warn!("Falling back to heuristic overview: {e}");
        build_heuristic_perspective(posts, Some(&format!("LLM summary unavailable ({e}); showing tag-based clusters.")))
      }
    }
  }

  /// Homework and model groups, the largest of each enhanced by the remote model.
  pub async fn build_grouped_ai_perspective(&self, posts: &[Post]) -> GroupedAIPerspective {
    let Some(client) = self.client.as_deref() else {
      return build_heuristic_grouped_perspective(posts, Some(NO_CREDENTIAL_NOTE));
    };

    let groups = group_posts(posts);
    let mut perspective = heuristic_grouped_from(&groups, None);
    let selected: Vec<PostBucket> = largest(groups.homework.values(), self.config.max_groups)
      .into_iter()
      .chain(largest(groups.models.values(), self.config.max_groups))
      .cloned()
      .collect();

    if selected.is_empty() {
      return perspective;
    }

    tracing::info!(
      "Summarizing {} groups remotely with concurrency {}",
      selected.len(),
      self.config.concurrency
    );

    let results = run_bounded(&selected, self.config.concurrency, move |bucket| {
      let bucket = bucket.clone();
      async move { self.summarize_group(client, bucket).await }
    })
    .await;

    let mut enhanced = 0;
    let mut failures: Vec<(String, ChatError)> = Vec::new();
    for (bucket, result) in selected.iter().zip(results) {
      match result {
        Ok(summary) => {
          if summary.mode == PerspectiveMode::Llm {
            enhanced += 1;
          }
          replace_group(&mut perspective, summary);
        }
        Err(e) => {
          tracing::warn!("Group {} kept its heuristic summary: {e}", bucket.key);
          failures.push((bucket.key.clone(), e));
        }
      }
    }

    if enhanced > 0 {
      perspective.mode = PerspectiveMode::Llm;
      perspective.model_used = self.config.model.clone();
    }
    if let Some((key, first)) = failures.first() {
      perspective.note = Some(format!(
        "{} of {} group summaries fell back to heuristics (first failure, {key}: {first}).",
        failures.len(),
        selected.len()
      ));
    }
    perspective
  }

  async fn summarize_group(&self, client: &dyn ChatClient, bucket: PostBucket) -> Result<GroupSummary, ChatError> {
    let input = GroupInput {
      key: bucket.key.clone(),
      label: bucket.label.clone(),
      count: bucket.len(),
      posts: sample_posts(&bucket.posts, GROUP_POST_LIMIT, GROUP_BODY_CHARS),
    };
    let key = cache_key(GROUP_PURPOSE, &self.config.model, &input);
    if let Some(CachedSummary::Group(cached)) = self.cache.get(&key) {
      tracing::debug!("Group {} served from cache", bucket.key);
      return Ok(cached);
    }

    let completion = complete_with_retry(client, &self.request(group_prompt(&input)), &self.config.retry).await?;
    let reply = parse_group_reply(&completion.content);
    let parsed = reply.is_some();
    let summary = merge_group_reply(&bucket, reply);

    // Unusable replies are not cached so a later request can try again
    if parsed {
      self.cache.set(key, CachedSummary::Group(summary.clone()));
    }
    Ok(summary)
  }

  fn request(&self, prompt: String) -> ChatRequest {
    ChatRequest {
      model: self.config.model.clone(),
      messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
      temperature: TEMPERATURE,
    }
  }
}

/// Fill a group summary from a model reply, patching anything it left out.
///
/// Every sampled post appears exactly once, in bucket order.
pub fn merge_group_reply(bucket: &PostBucket, reply: Option<GroupReply>) -> GroupSummary {
  let mode = if reply.is_some() { PerspectiveMode::Llm } else { PerspectiveMode::Heuristic };
  let reply = reply.unwrap_or_default();

  let overview = collapse_whitespace(&reply.overview);
  let overview = if overview.is_empty() { heuristic_overview(bucket) } else { overview };

  let posts = bucket
    .posts
    .iter()
    .take(GROUP_POST_LIMIT)
    .map(|post| {
      let takeaway = reply
        .posts
        .iter()
        .find(|candidate| candidate.id.trim() == post.id)
        .map(|candidate| collapse_whitespace(&candidate.takeaway))
        .filter(|takeaway| !takeaway.is_empty());

      match takeaway {
        Some(takeaway) => PostTakeaway {
          id: post.id.clone(),
          title: post.title.clone(),
          takeaway: truncate_chars(&takeaway, MAX_TAKEAWAY_CHARS),
        },
        None => heuristic_takeaway(post),
      }
    })
    .collect();

  GroupSummary { key: bucket.key.clone(), label: bucket.label.clone(), count: bucket.len(), overview, posts, mode }
}

fn replace_group(perspective: &mut GroupedAIPerspective, summary: GroupSummary) {
  let slot = perspective
    .homework_groups
    .iter_mut()
    .chain(perspective.model_groups.iter_mut())
    .find(|existing| existing.key == summary.key);
  if let Some(slot) = slot {
    *slot = summary;
  }
}

fn largest<'a>(buckets: impl Iterator<Item = &'a PostBucket>, limit: usize) -> Vec<&'a PostBucket> {
  let mut buckets: Vec<&PostBucket> = buckets.collect();
  buckets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.key.cmp(&b.key)));
  buckets.truncate(limit);
  buckets
}

fn sample_posts(posts: &[Post], limit: usize, body_chars: usize) -> Vec<SamplePost> {
  posts
    .iter()
    .take(limit)
    .map(|post| SamplePost {
      id: post.id.clone(),
      title: post.title.clone(),
      tags: post.tags.clone(),
      body: truncate_chars(&collapse_whitespace(&post.body), body_chars),
    })
    .collect()
}

fn overview_prompt(input: &OverviewInput) -> String {
  let sample = serde_json::to_string_pretty(&input.posts).unwrap_or_default();
  format!(
    "There are {total} discussion threads. Here is a sample of {n} of them as JSON:\n{sample}\n\n\
     Reply in plain text. Start with one line `Summary: <2-3 sentences>` describing what students discuss. \
     Then list 3 to 5 themes, one per line, formatted exactly as `<title> - <description> (<N> items)` \
     where N is how many sampled threads fit the theme.",
    total = input.total,
    n = input.posts.len(),
  )
}

fn group_prompt(input: &GroupInput) -> String {
  let sample = serde_json::to_string_pretty(&input.posts).unwrap_or_default();
  format!(
    "These threads belong to the group \"{label}\" ({count} threads in total). Sample as JSON:\n{sample}\n\n\
     Return only a JSON object shaped like \
     {{\"overview\": string, \"posts\": [{{\"id\": string, \"title\": string, \"takeaway\": string}}]}}. \
     The overview is 2-4 sentences about what this group discusses. \
     Give every sampled thread exactly one one-sentence takeaway, keyed by its id.",
    label = input.label,
    count = input.count,
  )
}

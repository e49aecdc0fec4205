#[cfg(test)]
mod loader_tests {
  use ingest::config::CSV_PATH_ENV;
  use ingest::{load_post_by_id, load_posts, IngestConfig};
  use serial_test::serial;
  use std::env;
  use std::fs;
  use tempfile::TempDir;

  const HEADER: &str = "thread_id,title_clean,title_raw,hw_number,model,base_model,version,name,text,url";

  fn write_csv(dir: &TempDir, contents: &str) -> IngestConfig {
    let path = dir.path().join("posts.csv");
    fs::write(&path, contents).unwrap();
    IngestConfig::new(path)
  }

  #[test]
  fn test_end_to_end_two_rows_for_one_homework() {
    let dir = TempDir::new().unwrap();
    let config = write_csv(
      &dir,
      &format!(
        "{HEADER}\n\
         101,Attention question,[HW3] Attention question,3,gpt-4o,gpt-4,v1,Ada,\"Why does softmax, here, blow up?\",https://example.com/101\n\
         102,Tokenizer question,,3,claude-3-opus,claude-3,v2,Grace,Tokenizer differs,\n"
      ),
    );

    let load = load_posts(&config);
    assert!(load.warning.is_none());
    assert_eq!(load.posts.len(), 2);
    assert_eq!(load.posts[0].tags, vec!["hw:3", "model:gpt-4o", "base_model:gpt-4", "version:v1"]);
    assert_eq!(load.posts[1].tags, vec!["hw:3", "model:claude-3-opus", "base_model:claude-3", "version:v2"]);
    assert_eq!(load.posts[0].body, "Why does softmax, here, blow up?");
    assert!(load.posts[1].url.is_none());
  }

  #[test]
  fn test_duplicate_thread_ids_collapse_to_first() {
    let dir = TempDir::new().unwrap();
    let config = write_csv(&dir, &format!("{HEADER}\n9,First,,,,,,,,\n9,Second,,,,,,,,\n"));

    let load = load_posts(&config);
    assert_eq!(load.posts.len(), 1);
    assert_eq!(load.posts[0].title, "First");
  }

  #[test]
  fn test_missing_file_yields_warning_not_error() {
    let dir = TempDir::new().unwrap();
    let config = IngestConfig::new(dir.path().join("nope.csv"));

    let load = load_posts(&config);
    assert!(load.posts.is_empty());
    let warning = load.warning.expect("missing file should warn");
    assert!(warning.contains("nope.csv"));
  }

  #[test]
  fn test_empty_file_yields_warning() {
    let dir = TempDir::new().unwrap();
    let config = write_csv(&dir, "");

    let load = load_posts(&config);
    assert!(load.posts.is_empty());
    assert!(load.warning.unwrap().contains("empty"));
  }

  #[test]
  fn test_invalid_utf8_yields_warning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("posts.csv");
    fs::write(&path, [0xff, 0xfe, 0x00, b'\n']).unwrap();

    let load = load_posts(&IngestConfig::new(path));
    assert!(load.posts.is_empty());
    assert!(load.warning.is_some());
  }

  #[test]
  fn test_lookup_by_id() {
    let dir = TempDir::new().unwrap();
    let config = write_csv(&dir, &format!("{HEADER}\n1,One,,,,,,,,\n2,Two,,,,,,,,\n"));

    let found = load_post_by_id(&config, "2");
    assert_eq!(found.post.map(|p| p.title), Some("Two".to_string()));
    assert!(found.warning.is_none());

    let missing = load_post_by_id(&config, "3");
    assert!(missing.post.is_none());
    assert!(missing.warning.is_none());
  }

  #[test]
  fn test_lookup_on_missing_file_carries_warning() {
    let dir = TempDir::new().unwrap();
    let lookup = load_post_by_id(&IngestConfig::new(dir.path().join("gone.csv")), "1");
    assert!(lookup.post.is_none());
    assert!(lookup.warning.is_some());
  }

  #[test]
  #[serial]
  fn test_config_from_env_override() {
    env::set_var(CSV_PATH_ENV, "/tmp/threads.csv");
    let config = IngestConfig::from_env();
    env::remove_var(CSV_PATH_ENV);

    assert_eq!(config.csv_path, std::path::PathBuf::from("/tmp/threads.csv"));
  }

  #[test]
  #[serial]
  fn test_config_from_env_default() {
    env::remove_var(CSV_PATH_ENV);
    assert_eq!(IngestConfig::from_env(), IngestConfig::default());
  }
}

#[cfg(test)]
mod config_tests {
  use perspective::config::*;
  use perspective::SummarizerConfig;
  use serial_test::serial;
  use std::env;

  const ALL: [&str; 7] =
    [API_KEY_ENV, MODEL_ENV, BASE_URL_ENV, MAX_GROUPS_ENV, CONCURRENCY_ENV, MAX_ATTEMPTS_ENV, CACHE_CAPACITY_ENV];

  fn clear() {
    for name in ALL {
      env::remove_var(name);
    }
  }

  #[test]
  #[serial]
  fn test_from_env_defaults() {
    clear();
    assert_eq!(SummarizerConfig::from_env(), SummarizerConfig::default());
  }

  #[test]
  #[serial]
  fn test_from_env_overrides() {
    clear();
    env::set_var(API_KEY_ENV, " sk-live ");
    env::set_var(MODEL_ENV, "gpt-4o");
    env::set_var(BASE_URL_ENV, "http://localhost:8080/v1");
    env::set_var(MAX_GROUPS_ENV, "3");
    env::set_var(CONCURRENCY_ENV, "6");
    env::set_var(MAX_ATTEMPTS_ENV, "2");
    env::set_var(CACHE_CAPACITY_ENV, "10");

    let config = SummarizerConfig::from_env();
    clear();

    assert_eq!(config.api_key.as_deref(), Some("sk-live"));
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.base_url, "http://localhost:8080/v1");
    assert_eq!(config.max_groups, 3);
    assert_eq!(config.concurrency, 6);
    assert_eq!(config.retry.max_attempts, 2);
    assert_eq!(config.cache_capacity, 10);
  }

  #[test]
  #[serial]
  fn test_from_env_ignores_bad_values() {
    clear();
    env::set_var(API_KEY_ENV, "   ");
    env::set_var(MAX_GROUPS_ENV, "0");
    env::set_var(CONCURRENCY_ENV, "lots");

    let config = SummarizerConfig::from_env();
    clear();

    assert!(!config.has_credential());
    assert_eq!(config.max_groups, DEFAULT_MAX_GROUPS);
    assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
  }
}

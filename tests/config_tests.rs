use std::env;

use jump::config::{self, Config};

#[test]
fn test_defaults_when_unset() {
    env::remove_var("JUMP_USER");
    env::remove_var("JUMP_LOCAL_KEY");
    env::remove_var("JUMP_REMOTE_KEY_DIR");
    env::remove_var("JUMP_HOST");

    let config = Config::from_env();

    assert_eq!(config.jump_user, config::DEFAULT_JUMP_USER);
    assert_eq!(config.local_key, config::DEFAULT_LOCAL_KEY);
    assert_eq!(config.remote_key_dir, config::DEFAULT_REMOTE_KEY_DIR);
    // No safe default exists for the jump host; it stays unset.
    assert!(config.jump_host.is_empty());
}

#[test]
fn test_region_override() {
    env::set_var("JUMP_REGION", "ap-southeast-1");

    let config = Config::from_env();
    assert_eq!(config.region, "ap-southeast-1");

    // Clean up
    env::remove_var("JUMP_REGION");
}

#[test]
fn test_cache_and_history_paths_override() {
    env::set_var("JUMP_CACHE_FILE", "/tmp/inventory.csv");
    env::set_var("JUMP_HISTORY_FILE", "/tmp/history");

    let config = Config::from_env();
    assert_eq!(config.cache_file.to_str(), Some("/tmp/inventory.csv"));
    assert_eq!(config.history_file.to_str(), Some("/tmp/history"));

    // Clean up
    env::remove_var("JUMP_CACHE_FILE");
    env::remove_var("JUMP_HISTORY_FILE");
}

use std::env;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_CACHE_FILE: &str = ".jump-cache.csv";
pub const DEFAULT_HISTORY_FILE: &str = ".jump_history";
pub const DEFAULT_JUMP_USER: &str = "ec2-user";
pub const DEFAULT_LOCAL_KEY: &str = "~/.ssh/id_ed25519";
pub const DEFAULT_REMOTE_KEY_DIR: &str = "/home/ec2-user/keys";

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

/// Effective settings for one invocation. Built once in `main` from the
/// environment (plus CLI overrides) and passed down; nothing reads the
/// process environment after construction.
#[derive(Clone, Debug)]
pub struct Config {
    /// AWS region queried for running instances.
    pub region: String,
    /// Path of the tabular inventory cache.
    pub cache_file: PathBuf,
    /// Path of the prompt history file.
    pub history_file: PathBuf,
    /// Jump host address. Empty until configured; connections are refused
    /// while it is empty.
    pub jump_host: String,
    /// Login user on the jump host.
    pub jump_user: String,
    /// Private key on the local machine used for the first hop. May contain
    /// a leading `~`.
    pub local_key: String,
    /// Directory on the jump host holding the per-instance target keys.
    pub remote_key_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            region: env_or("JUMP_REGION", DEFAULT_REGION),
            cache_file: PathBuf::from(env_or("JUMP_CACHE_FILE", DEFAULT_CACHE_FILE)),
            history_file: PathBuf::from(env_or("JUMP_HISTORY_FILE", DEFAULT_HISTORY_FILE)),
            jump_host: env_or("JUMP_HOST", ""),
            jump_user: env_or("JUMP_USER", DEFAULT_JUMP_USER),
            local_key: env_or("JUMP_LOCAL_KEY", DEFAULT_LOCAL_KEY),
            remote_key_dir: env_or("JUMP_REMOTE_KEY_DIR", DEFAULT_REMOTE_KEY_DIR),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

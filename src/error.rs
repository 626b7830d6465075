/// Error types shared across the crate
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JumpError>;

/// Errors that can occur while fetching, caching or connecting
#[derive(Debug, Error)]
pub enum JumpError {
    /// The primary describe-instances call failed
    #[error("EC2 API error: {0}")]
    Api(String),

    /// Cache file could not be written
    #[error("Cache write error: {0}")]
    CacheWrite(String),

    /// Connection refused before spawning ssh: required values are missing
    #[error("Missing required SSH parameters: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// The local jump key does not exist on disk
    #[error("Local jump key file not found: {0}")]
    LocalKeyNotFound(String),

    /// The ssh binary itself could not be found
    #[error("'ssh' command not found. Is the OpenSSH client installed and in your PATH?")]
    SshNotFound,

    /// ssh ran but the session ended with a non-zero exit code
    #[error("SSH command failed with exit code {0}")]
    SshExit(i32),

    /// Spawning ssh failed for a reason other than a missing binary
    #[error("Failed to execute ssh: {0}")]
    SshSpawn(String),

    /// The interactive prompt could not be set up or read
    #[error("Prompt error: {0}")]
    Prompt(String),
}

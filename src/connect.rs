//! Nested SSH connector: local machine -> jump host -> target instance.
//!
//! The outer hop authenticates to the jump host with a local key and
//! allocates a terminal; the inner hop runs on the jump host and uses a
//! key resident there. Actual transport is delegated to the `ssh` binary.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use yansi::Paint;

use crate::config::Config;
use crate::error::{JumpError, Result};
use crate::record::InstanceRecord;

/// Fully validated argument set for one nested SSH invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SshInvocation {
    /// Expanded path of the local jump-host key.
    pub local_key: String,
    /// `user@host` for the jump host.
    pub jump: String,
    /// Command executed on the jump host to reach the target.
    pub remote_command: String,
}

impl SshInvocation {
    /// Argument vector passed to `ssh`: `-i <local_key> -t <jump> <remote>`.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-i".to_string(),
            self.local_key.clone(),
            "-t".to_string(),
            self.jump.clone(),
            self.remote_command.clone(),
        ]
    }
}

/// Derive the key path on the jump host from an instance's key pair name:
/// the part before the first `_`, dropped into the remote key directory.
/// Returns `None` when the key name is absent or the `N/A` placeholder.
pub fn derive_remote_key_path(key_name: &str, remote_key_dir: &str) -> Option<String> {
    if !InstanceRecord::is_present(key_name) {
        return None;
    }
    let base = key_name.split('_').next().unwrap_or(key_name);
    Some(format!("{}/{}.pem", remote_key_dir.trim_end_matches('/'), base))
}

/// Validate everything needed for a nested connection and build the
/// invocation. Refuses (never partially connects) when any required value
/// is missing or the local key does not exist on disk.
pub fn prepare(record: &InstanceRecord, config: &Config) -> Result<SshInvocation> {
    let remote_key = derive_remote_key_path(&record.key_name, &config.remote_key_dir);

    let mut missing = Vec::new();
    if !InstanceRecord::is_present(&record.private_ip) {
        missing.push("target private IP".to_string());
    }
    if !InstanceRecord::is_present(&record.target_user) {
        missing.push("target user".to_string());
    }
    if config.jump_host.trim().is_empty() {
        missing.push("jump host address".to_string());
    }
    if config.jump_user.trim().is_empty() {
        missing.push("jump host user".to_string());
    }
    if config.local_key.trim().is_empty() {
        missing.push("local key path".to_string());
    }
    if remote_key.is_none() {
        missing.push(format!("remote key path (from KeyName '{}')", record.key_name));
    }
    if !missing.is_empty() {
        return Err(JumpError::MissingFields(missing));
    }
    let Some(remote_key) = remote_key else {
        return Err(JumpError::MissingFields(vec!["remote key path".to_string()]));
    };

    let local_key = shellexpand::tilde(&config.local_key).into_owned();
    if !Path::new(&local_key).exists() {
        return Err(JumpError::LocalKeyNotFound(local_key));
    }

    Ok(SshInvocation {
        local_key,
        jump: format!("{}@{}", config.jump_user, config.jump_host),
        remote_command: format!(
            "ssh -i {} {}@{}",
            remote_key, record.target_user, record.private_ip
        ),
    })
}

/// Spawn the nested session with inherited stdio and block until it ends.
pub fn run(invocation: &SshInvocation) -> Result<()> {
    tracing::info!(
        command = %format!("ssh {}", invocation.args().join(" ")),
        "attempting nested SSH connection"
    );

    let status = Command::new("ssh")
        .args(invocation.args())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();

    match status {
        Ok(s) if s.success() => Ok(()),
        Ok(s) => Err(JumpError::SshExit(s.code().unwrap_or(-1))),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(JumpError::SshNotFound),
        Err(e) => Err(JumpError::SshSpawn(e.to_string())),
    }
}

/// Full connection flow for one selected record: validate, describe both
/// hops, run the session. Every failure is reported here; none escalates.
pub fn connect(record: &InstanceRecord, config: &Config) {
    let invocation = match prepare(record, config) {
        Ok(inv) => inv,
        Err(e) => {
            tracing::error!(%e, instance = %record.instance_id, "refusing connection");
            eprintln!("{}: {}", Paint::new("Cannot connect").red(), e);
            return;
        }
    };

    println!(
        "\nSelected: {} ({})",
        Paint::new(&record.name).cyan(),
        record.private_ip
    );
    println!("Target user: {} (determined from AMI info/defaults)", record.target_user);
    println!(
        "  Local -> Jump: ssh -i '{}' -t {}",
        invocation.local_key, invocation.jump
    );
    println!("  Jump -> Target: {}", invocation.remote_command);

    match run(&invocation) {
        Ok(()) => println!("{}", Paint::new("SSH session ended.").green()),
        Err(e @ JumpError::SshExit(_)) => {
            tracing::warn!(%e, "ssh session failed");
            eprintln!("{}", Paint::new(format!("{}.", e)).yellow());
        }
        Err(e) => {
            tracing::error!(%e, "could not execute ssh");
            eprintln!("{}: {}", Paint::new("Error").red(), e);
        }
    }
}

use std::fs;

use jump::config::Config;
use jump::connect::{self, SshInvocation};
use jump::error::JumpError;
use jump::record::InstanceRecord;

fn test_config(local_key: &str) -> Config {
    Config {
        region: "us-east-1".to_string(),
        cache_file: ".jump-cache.csv".into(),
        history_file: ".jump_history".into(),
        jump_host: "203.0.113.10".to_string(),
        jump_user: "ec2-user".to_string(),
        local_key: local_key.to_string(),
        remote_key_dir: "/home/ec2-user/keys".to_string(),
    }
}

fn target_record() -> InstanceRecord {
    InstanceRecord {
        instance_id: "i-0abc123".to_string(),
        name: "web-frontend".to_string(),
        private_ip: "10.1.2.3".to_string(),
        key_name: "mykey_prod".to_string(),
        target_user: "ubuntu".to_string(),
        platform_details: "Linux/UNIX".to_string(),
        image_id: "ami-123".to_string(),
        image_name: "ubuntu-22.04-server".to_string(),
    }
}

#[test]
fn test_remote_key_path_strips_key_name_suffix() {
    let path = connect::derive_remote_key_path("mykey_prod", "/home/ec2-user/keys").unwrap();
    assert_eq!(path, "/home/ec2-user/keys/mykey.pem");
    assert!(path.ends_with("mykey.pem"));
}

#[test]
fn test_remote_key_path_without_delimiter_uses_whole_name() {
    assert_eq!(
        connect::derive_remote_key_path("mykey", "/home/ec2-user/keys"),
        Some("/home/ec2-user/keys/mykey.pem".to_string())
    );
}

#[test]
fn test_remote_key_path_absent_for_placeholder_or_empty() {
    assert_eq!(connect::derive_remote_key_path("N/A", "/home/ec2-user/keys"), None);
    assert_eq!(connect::derive_remote_key_path("", "/home/ec2-user/keys"), None);
    assert_eq!(connect::derive_remote_key_path("   ", "/home/ec2-user/keys"), None);
}

#[test]
fn test_remote_key_path_tolerates_trailing_slash_in_dir() {
    assert_eq!(
        connect::derive_remote_key_path("mykey", "/home/ec2-user/keys/"),
        Some("/home/ec2-user/keys/mykey.pem".to_string())
    );
}

#[test]
fn test_prepare_builds_nested_invocation() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("id_ed25519");
    fs::write(&key_path, "key material").unwrap();

    let config = test_config(key_path.to_str().unwrap());
    let invocation = connect::prepare(&target_record(), &config).unwrap();

    assert_eq!(
        invocation,
        SshInvocation {
            local_key: key_path.to_str().unwrap().to_string(),
            jump: "ec2-user@203.0.113.10".to_string(),
            remote_command: "ssh -i /home/ec2-user/keys/mykey.pem ubuntu@10.1.2.3".to_string(),
        }
    );
    assert_eq!(
        invocation.args(),
        vec![
            "-i".to_string(),
            key_path.to_str().unwrap().to_string(),
            "-t".to_string(),
            "ec2-user@203.0.113.10".to_string(),
            "ssh -i /home/ec2-user/keys/mykey.pem ubuntu@10.1.2.3".to_string(),
        ]
    );
}

#[test]
fn test_prepare_refuses_when_fields_missing_and_names_them() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("id_ed25519");
    fs::write(&key_path, "key material").unwrap();

    let config = test_config(key_path.to_str().unwrap());
    let mut record = target_record();
    record.private_ip = String::new();
    record.key_name = "N/A".to_string();

    match connect::prepare(&record, &config) {
        Err(JumpError::MissingFields(fields)) => {
            assert!(fields.iter().any(|f| f.contains("target private IP")));
            assert!(fields.iter().any(|f| f.contains("remote key path")));
        }
        other => panic!("expected MissingFields, got {:?}", other),
    }
}

#[test]
fn test_prepare_refuses_unconfigured_jump_host() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("id_ed25519");
    fs::write(&key_path, "key material").unwrap();

    let mut config = test_config(key_path.to_str().unwrap());
    config.jump_host = String::new();

    match connect::prepare(&target_record(), &config) {
        Err(JumpError::MissingFields(fields)) => {
            assert_eq!(fields, vec!["jump host address".to_string()]);
        }
        other => panic!("expected MissingFields, got {:?}", other),
    }
}

#[test]
fn test_prepare_refuses_missing_local_key() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("nonexistent_key");

    let config = test_config(key_path.to_str().unwrap());
    match connect::prepare(&target_record(), &config) {
        Err(JumpError::LocalKeyNotFound(path)) => {
            assert_eq!(path, key_path.to_str().unwrap());
        }
        other => panic!("expected LocalKeyNotFound, got {:?}", other),
    }
}

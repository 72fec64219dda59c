//! Config loading integration tests

use std::path::PathBuf;

use startup_swipe::config::ConfigError;
use startup_swipe::Config;
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() {
    let temp = TempDir::new().unwrap();
    let config = Config::load(&temp.path().join("absent.toml")).unwrap();

    assert_eq!(config.server.bind_addr, "0.0.0.0");
    assert_eq!(config.server.http_port, 8080);
    assert_eq!(config.db_path(), PathBuf::from("./data/swipe.db"));
    assert!(config.auth.jwt_secret.is_none());
}

#[test]
fn test_load_full_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("startup-swipe.toml");
    std::fs::write(
        &path,
        r#"
[server]
bind_addr = "127.0.0.1"
http_port = 9090
cors_max_age_secs = 120

[storage]
data_dir = "/var/lib/startup-swipe"
db_file = "records.db"

[auth]
jwt_secret = "a-very-long-secret-for-integration-tests"
token_expiry_secs = 600
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.server.bind_addr, "127.0.0.1");
    assert_eq!(config.server.http_port, 9090);
    assert_eq!(config.server.cors_max_age_secs, 120);
    assert_eq!(
        config.db_path(),
        PathBuf::from("/var/lib/startup-swipe/records.db")
    );
    assert_eq!(config.auth.token_expiry_secs, 600);
    assert!(config.validate().is_ok());

    let jwt = config.jwt_validator().unwrap();
    let token = jwt.generate_token("u1", None).unwrap();
    assert_eq!(jwt.verify_token(&token).unwrap().sub, "u1");
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    std::fs::write(&path, "[server\nhttp_port = \"eighty\"").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().starts_with("Invalid config file"));
}

#[test]
fn test_short_secret_rejected_outside_dev_mode() {
    let config: Config = toml::from_str(
        r#"
[auth]
jwt_secret = "short"
"#,
    )
    .unwrap();
    assert!(config.validate().is_err());

    let mut dev = config.clone();
    dev.auth.dev_mode = true;
    assert!(dev.validate().is_ok());
    assert!(dev.jwt_validator().is_ok());
}

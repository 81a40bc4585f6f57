//! Tests for Config
//!
//! These tests verify:
//! - Defaults and the builder
//! - Loading dotenv-style files
//! - Discovering `jsondb/.env.<environment>` upward from a directory
//! - Process environment overrides

use std::fs;
use std::path::Path;
use std::time::Duration;

use jsondb_client::config::{parse_env, strip_quotes, Config, Environment, MIN_TIMEOUT_MS};
use jsondb_client::ClientError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_env(dir: &Path, environment: Environment, contents: &str) {
    let env_dir = dir.join("jsondb");
    fs::create_dir_all(&env_dir).unwrap();
    fs::write(env_dir.join(environment.env_file_name()), contents).unwrap();
}

// =============================================================================
// Defaults and Builder Tests
// =============================================================================

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5555);
    assert_eq!(config.password(), None);
    assert_eq!(config.read_timeout(), Duration::from_secs(5));
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.addr(), "localhost:5555");
}

#[test]
fn test_builder() {
    let config = Config::builder()
        .host("db.internal")
        .port(6000)
        .password("'quoted'")
        .timeout_ms(250)
        .write_timeout_ms(0)
        .environment(Environment::Testing)
        .build();

    assert_eq!(config.addr(), "db.internal:6000");
    assert_eq!(config.password(), Some("quoted"));
    assert_eq!(config.connect_timeout(), Duration::from_millis(250));
    assert_eq!(config.read_timeout(), Duration::from_millis(250));
    assert_eq!(config.write_timeout(), Duration::from_millis(MIN_TIMEOUT_MS));
    assert_eq!(config.environment, Environment::Testing);
}

#[test]
fn test_zero_timeouts_are_bounded() {
    let config = Config::builder().timeout_ms(0).build();
    let floor = Duration::from_millis(MIN_TIMEOUT_MS);
    assert_eq!(config.connect_timeout(), floor);
    assert_eq!(config.read_timeout(), floor);
    assert_eq!(config.write_timeout(), floor);

    let mut config = Config::default();
    config.read_timeout_ms = 0;
    assert_eq!(config.read_timeout(), floor);
}

#[test]
fn test_password_field_is_unquoted_on_read() {
    let mut config = Config::default();
    config.password = Some("'pw'".to_string());
    assert_eq!(config.password(), Some("pw"));

    config.password = Some("\"\"".to_string());
    assert_eq!(config.password(), None);
}

#[test]
fn test_empty_password_is_none() {
    let config = Config::builder().password("\"\"").build();
    assert_eq!(config.password, None);
    assert_eq!(config.password(), None);
}

#[test]
fn test_strip_quotes() {
    assert_eq!(strip_quotes("'abc'"), "abc");
    assert_eq!(strip_quotes("\"abc\""), "abc");
    assert_eq!(strip_quotes("  abc  "), "abc");
    assert_eq!(strip_quotes("a'b"), "a'b");
}

#[test]
fn test_environment_parse() {
    assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
    assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Testing);
    assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
    assert!(matches!("staging".parse::<Environment>(), Err(ClientError::Config(_))));
    assert_eq!(Environment::Production.env_file_name(), ".env.production");
}

// =============================================================================
// Env File Tests
// =============================================================================

#[test]
fn test_parse_env_skips_comments_and_blanks() {
    let vars = parse_env("# comment\n\nPORT=6001\nexport HOST = example.org \nSERVER_PASSWORD='a=b'\n").unwrap();
    assert_eq!(
        vars,
        vec![
            ("PORT".to_string(), "6001".to_string()),
            ("HOST".to_string(), "example.org".to_string()),
            ("SERVER_PASSWORD".to_string(), "a=b".to_string()),
        ]
    );
}

#[test]
fn test_parse_env_rejects_malformed_line() {
    let err = parse_env("PORT=1\nJUSTAWORD\n").unwrap_err();
    match err {
        ClientError::Config(message) => assert!(message.contains("line 2")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_from_env_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".env.development");
    fs::write(
        &path,
        "PORT=7000\nSERVER_PASSWORD=\"s3cret\"\nTIMEOUT_MS=1500\nENCRYPTION_KEY=ignored\n",
    )
    .unwrap();

    let config = Config::from_env_file(&path).unwrap();
    assert_eq!(config.port, 7000);
    assert_eq!(config.host, "localhost");
    assert_eq!(config.password(), Some("s3cret"));
    assert_eq!(config.read_timeout(), Duration::from_millis(1500));
}

#[test]
fn test_from_env_file_invalid_port() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".env");
    fs::write(&path, "PORT=not-a-port\n").unwrap();

    assert!(matches!(Config::from_env_file(&path), Err(ClientError::Config(_))));
}

#[test]
fn test_from_env_file_zero_timeout() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".env");
    fs::write(&path, "TIMEOUT_MS=0\n").unwrap();

    assert!(matches!(Config::from_env_file(&path), Err(ClientError::Config(_))));
}

#[test]
fn test_from_env_file_missing() {
    let temp = TempDir::new().unwrap();
    let result = Config::from_env_file(temp.path().join("nope"));
    assert!(matches!(result, Err(ClientError::Config(_))));
}

// =============================================================================
// Discovery Tests
// =============================================================================

#[test]
fn test_discover_walks_upward() {
    let temp = TempDir::new().unwrap();
    write_env(temp.path(), Environment::Testing, "PORT=6380\nSERVER_PASSWORD=test-password\n");
    let nested = temp.path().join("a").join("b").join("c");
    fs::create_dir_all(&nested).unwrap();

    let config = Config::discover(Environment::Testing, &nested).unwrap();
    assert_eq!(config.port, 6380);
    assert_eq!(config.password(), Some("test-password"));
    assert_eq!(config.environment, Environment::Testing);
}

#[test]
fn test_discover_picks_requested_environment() {
    let temp = TempDir::new().unwrap();
    write_env(temp.path(), Environment::Development, "PORT=1111\n");
    write_env(temp.path(), Environment::Production, "PORT=2222\n");

    let dev = Config::discover(Environment::Development, temp.path()).unwrap();
    let prod = Config::discover(Environment::Production, temp.path()).unwrap();
    assert_eq!(dev.port, 1111);
    assert_eq!(prod.port, 2222);
}

#[test]
fn test_discover_not_found() {
    let temp = TempDir::new().unwrap();
    assert!(Config::find_env_file(Environment::Production, temp.path()).is_none());
    assert!(matches!(
        Config::discover(Environment::Production, temp.path()),
        Err(ClientError::Config(_))
    ));
}

// =============================================================================
// Environment Override Tests
// =============================================================================

#[test]
fn test_env_overrides() {
    std::env::set_var("PORT", "6123");
    std::env::set_var("SERVER_PASSWORD", "'from-env'");

    let config = Config::builder().port(1).build().with_env_overrides();

    std::env::remove_var("PORT");
    std::env::remove_var("SERVER_PASSWORD");

    let config = config.unwrap();
    assert_eq!(config.port, 6123);
    assert_eq!(config.password(), Some("from-env"));
}

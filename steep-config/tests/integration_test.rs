//! Integration tests for steep-config

use std::io::Write;
use std::time::Duration;
use steep_config::domains::logging::{LogFormat, LogLevel};
use steep_config::*;
use temp_env::with_vars;

const TARGET_VARS: [&str; 6] = [
    "HOST",
    "PORT",
    "BASE_PATH",
    "STEEP_HOST",
    "STEEP_PORT",
    "STEEP_BASE_PATH",
];

fn cleared_target_vars() -> Vec<(&'static str, Option<&'static str>)> {
    TARGET_VARS.iter().map(|name| (*name, None)).collect()
}

#[test]
fn test_default_config_validation() {
    let config = SteepConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let mut vars = cleared_target_vars();
    vars.extend([
        ("STEEP_HTTP_TIMEOUT", Some("60")),
        ("STEEP_LOG_LEVEL", Some("debug")),
        ("STEEP_LOG_FORMAT", Some("json")),
        ("STEEP_USERS", Some("25")),
        ("STEEP_RUN_TIME", Some("120")),
        ("STEEP_USERNAME", Some("user7")),
    ]);

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(config.http.timeout, Duration::from_secs(60));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.load.users, 25);
        assert_eq!(config.load.run_time, Duration::from_secs(120));
        assert_eq!(config.session.username, "user7");
        assert_eq!(config.target, TargetConfig::default());
    });
}

#[test]
fn test_bare_target_variables() {
    let mut vars = cleared_target_vars();
    vars.extend([
        ("HOST", Some("http://teastore.internal")),
        ("PORT", Some("18080")),
        ("BASE_PATH", Some("/webui")),
    ]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.target.url("/login"), "http://teastore.internal:18080/webui/login");
    });
}

#[test]
fn test_prefixed_target_variable_wins() {
    let mut vars = cleared_target_vars();
    vars.extend([("PORT", Some("18080")), ("STEEP_PORT", Some("9090"))]);

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.target.port, 9090);
    });
}

#[test]
fn test_invalid_env_values_are_reported() {
    let mut vars = cleared_target_vars();
    vars.push(("STEEP_USERS", Some("many")));

    with_vars(vars, || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("USERS"));
    });

    let mut vars = cleared_target_vars();
    vars.push(("PORT", Some("eighty")));

    with_vars(vars, || {
        assert!(ConfigLoader::new().from_env().is_err());
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = SteepConfig::generate_sample();
    let parsed: SteepConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.session.selectors.product_links.len(), 2);
}

#[test]
fn test_comprehensive_config() {
    let yaml = r#"
target:
  host: "https://shop.example.com"
  port: 8443
  base_path: "/store"

http:
  timeout: 45
  max_redirects: 5
  user_agent: "Test Agent"
  verify_ssl: false

logging:
  level: warn
  format: compact
  directives:
    - "goose=error"

session:
  username: "user2"
  token_policy: optional
  wait_min: 500
  wait_max: 750
  reset_database: true
  selectors:
    category_links:
      - "nav a.category"

load:
  flow: navigation
  users: 50
  hatch_rate: 5.0
  run_time: 600
  report_file: "goose-report.html"

report:
  k6_summary: "out/k6.json"
  jtl: "out/results.csv"
  pdf: null
  summary: "out/summary.json"
  rolling_window: 20
  apdex:
    satisfied_ms: 300
    tolerated_ms: 1200
    labels:
      - "GET Home"
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(cleared_target_vars(), || {
        let config = ConfigLoader::new().from_file(file.path()).unwrap();

        assert_eq!(config.target.origin(), "https://shop.example.com:8443");
        assert_eq!(config.http.max_redirects, 5);
        assert!(!config.http.verify_ssl);
        assert_eq!(config.logging.filter_directives(), "warn,goose=error");
        assert_eq!(config.session.token_policy, TokenPolicy::Optional);
        assert_eq!(config.session.wait_max, Duration::from_millis(750));
        assert!(config.session.reset_database);
        assert_eq!(config.session.selectors.category_links, vec!["nav a.category"]);
        // untouched selector lists keep their defaults
        assert_eq!(config.session.selectors.product_names[0], "h2.product-title");
        assert_eq!(config.load.flow, Flow::Navigation);
        assert_eq!(config.load.users, 50);
        assert!(config.report.pdf.is_none());
        assert_eq!(config.report.rolling_window, 20);
        assert_eq!(config.report.apdex.labels, vec!["GET Home"]);
        assert_eq!(config.report.preview_rows, 5);
    });
}

#[test]
fn test_invalid_file_fails_validation() {
    let yaml = "load:\n  users: 0\n";
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(cleared_target_vars(), || {
        let err = ConfigLoader::new().from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { ref domain, .. } if domain == "load"));
    });
}

#[test]
fn test_missing_file() {
    let err = ConfigLoader::new()
        .load(Some("/definitely/not/here.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}

use std::time::Duration;

use dumpdock::config::GlobalConfig;
use dumpdock::AppError;

const MINIMAL: &str = r#"
dumps_dir = "/var/crashdumps"
analyzer_path = "/opt/debugger/cdb"
"#;

#[test]
fn minimal_config_applies_defaults() {
    let config = GlobalConfig::from_toml_str(MINIMAL).expect("parse");

    assert_eq!(config.idle_timeout(), Duration::from_secs(120));
    assert_eq!(config.hard_ceiling(), None);
    assert_eq!(config.analysis.directive, "!analyze -v;q");
    assert_eq!(config.working_dir(), config.dumps_dir.as_path());
}

#[test]
fn explicit_analysis_section_overrides_defaults() {
    let raw = r#"
dumps_dir = "/var/crashdumps"
analyzer_path = "/opt/debugger/cdb"

[analysis]
idle_timeout_seconds = 30
hard_timeout_seconds = 600
directive = "!analyze -v; !threads; q"
working_dir = "/tmp/scratch"
"#;
    let config = GlobalConfig::from_toml_str(raw).expect("parse");

    assert_eq!(config.idle_timeout(), Duration::from_secs(30));
    assert_eq!(config.hard_ceiling(), Some(Duration::from_secs(600)));
    assert_eq!(config.analysis.directive, "!analyze -v; !threads; q");
    assert_eq!(config.working_dir(), std::path::Path::new("/tmp/scratch"));
}

#[test]
fn zero_idle_timeout_is_rejected() {
    let raw = r#"
dumps_dir = "/var/crashdumps"
analyzer_path = "/opt/debugger/cdb"

[analysis]
idle_timeout_seconds = 0
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("must fail");

    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn blank_directive_is_rejected() {
    let raw = r#"
dumps_dir = "/var/crashdumps"
analyzer_path = "/opt/debugger/cdb"

[analysis]
directive = "  "
"#;
    let err = GlobalConfig::from_toml_str(raw).expect_err("must fail");

    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn missing_dumps_dir_key_is_rejected() {
    let err = GlobalConfig::from_toml_str("analyzer_path = \"/opt/cdb\"").expect_err("must fail");

    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn existing_dumps_dir_is_canonicalized() {
    let temp = tempfile::tempdir().expect("tempdir");
    let raw = format!(
        "dumps_dir = {:?}\nanalyzer_path = \"/opt/debugger/cdb\"\n",
        temp.path().to_string_lossy()
    );
    let config = GlobalConfig::from_toml_str(&raw).expect("parse");

    assert_eq!(
        config.dumps_dir,
        temp.path().canonicalize().expect("canonicalize")
    );
}

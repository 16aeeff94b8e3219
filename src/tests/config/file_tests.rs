use crate::config::{JoinConfig, JoinOptions, SideConfig};
use crate::error::ConfigError;
use crate::extract::KeyRules;

#[test]
fn side_config_defaults_to_the_whole_row() {
    let side = SideConfig::default();
    assert_eq!(side.join_column, -1);
    assert_eq!(side.to_rules().unwrap(), KeyRules::whole_row());
}

#[test]
fn side_config_compiles_into_rules() {
    let side = SideConfig {
        separator: ",".into(),
        join_column: 4,
        json_subquery: Some("data.index".into()),
        clean: true,
    };
    let rules = side.to_rules().unwrap();
    assert_eq!(rules.column, Some(4));
    assert_eq!(rules.separator, ",");
    assert_eq!(rules.json_path.map(|p| p.as_str().to_string()), Some("data.index".into()));
    assert!(rules.clean);
}

#[test]
fn json_config_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("join.json");
    std::fs::write(
        &path,
        r#"{"join": "left", "index_file": "idx.csv", "right": {"separator": ",", "join_column": 0}, "concurrency": 4}"#,
    )
    .unwrap();

    let cfg = JoinConfig::from_path(&path).unwrap();
    assert_eq!(cfg.join.as_deref(), Some("left"));
    assert_eq!(cfg.index_file.as_deref(), Some("idx.csv"));
    assert_eq!(cfg.right.join_column, 0);
    assert_eq!(cfg.left, SideConfig::default());
    assert_eq!(cfg.concurrency, Some(4));
    assert!(cfg.exec.is_none());
    assert!(!cfg.verbose);
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_config() {
    let yaml = r#"
join: disjoint
exec: "grep -q {} /etc/hosts"
shell: bash
left:
  separator: ","
  join_column: 4
  json_subquery: data.user_id
  clean: true
error_policy: continue
verbose: true
"#;
    let cfg = JoinConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(cfg.join.as_deref(), Some("disjoint"));
    assert_eq!(cfg.exec.as_deref(), Some("grep -q {} /etc/hosts"));
    assert_eq!(cfg.shell.as_deref(), Some("bash"));
    assert_eq!(cfg.left.join_column, 4);
    assert_eq!(cfg.left.json_subquery.as_deref(), Some("data.user_id"));
    assert!(cfg.left.clean);
    assert_eq!(cfg.right, SideConfig::default());
    assert_eq!(cfg.error_policy.as_deref(), Some("continue"));
    assert!(cfg.verbose);
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_config_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("join.YML");
    std::fs::write(&path, "join: inner\nexec: cat {}\n").unwrap();

    let cfg = JoinConfig::from_path(&path).unwrap();
    assert_eq!(cfg.exec.as_deref(), Some("cat {}"));
}

#[cfg(feature = "toml")]
#[test]
fn toml_config() {
    let toml = r#"
join = "inner"
index_file = "users.csv"
buffer_size = 10

[right]
separator = ","
join_column = 0
"#;
    let cfg = JoinConfig::from_toml_str(toml).unwrap();
    assert_eq!(cfg.index_file.as_deref(), Some("users.csv"));
    assert_eq!(cfg.buffer_size, Some(10));
    assert_eq!(cfg.right.separator, ",");
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("join.ini");
    std::fs::write(&path, "join=inner").unwrap();

    assert!(matches!(
        JoinConfig::from_path(&path),
        Err(ConfigError::ConfigFile { .. })
    ));
}

#[test]
fn missing_or_malformed_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        JoinConfig::from_path(dir.path().join("absent.json")),
        Err(ConfigError::ConfigFile { .. })
    ));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        JoinConfig::from_path(&path),
        Err(ConfigError::ConfigFile { .. })
    ));
}

#[test]
fn options_validate() {
    assert!(JoinOptions::default().validate().is_ok());

    let opts = JoinOptions {
        chunk_size: 0,
        ..JoinOptions::default()
    };
    assert!(matches!(opts.validate(), Err(ConfigError::Zero("chunk size"))));
}

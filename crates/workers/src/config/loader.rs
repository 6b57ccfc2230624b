use std::path::{Path, PathBuf};

use super::schema::WorkerConfig;

const CONFIG_DIR_NAME: &str = "courier";
const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("validation: {0}")]
    Validation(String),
}

/// `<config dir>/courier/config.yaml`, e.g. `~/.config/courier/config.yaml` on Linux.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

pub fn load_from_file(path: &Path) -> Result<WorkerConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

/// A missing file yields the defaults; any other read error is reported.
pub fn load_or_default(path: &Path) -> Result<WorkerConfig, LoadError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => load_from_str(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(WorkerConfig::default()),
        Err(e) => Err(e.into()),
    }
}

pub fn load_from_str(yaml: &str) -> Result<WorkerConfig, LoadError> {
    let cfg: WorkerConfig = if yaml.trim().is_empty() {
        WorkerConfig::default()
    } else {
        serde_yaml::from_str(yaml)?
    };
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &WorkerConfig) -> Result<(), LoadError> {
    if cfg.engine.address.is_empty() {
        return Err(LoadError::Validation("engine.address must not be empty".into()));
    }
    if cfg.engine.namespace.is_empty() {
        return Err(LoadError::Validation("engine.namespace must not be empty".into()));
    }
    if cfg.engine.task_queue.is_empty() {
        return Err(LoadError::Validation("engine.task_queue must not be empty".into()));
    }
    if cfg.engine.max_concurrent_activities == 0 {
        return Err(LoadError::Validation(
            "engine.max_concurrent_activities must be > 0".into(),
        ));
    }
    if cfg.secret_broker.address.is_empty() {
        return Err(LoadError::Validation(
            "secret_broker.address must not be empty".into(),
        ));
    }
    if cfg.secret_broker.timeout_ms == 0 {
        return Err(LoadError::Validation(
            "secret_broker.timeout_ms must be > 0".into(),
        ));
    }
    if cfg.secret_broker.client_cert.is_some() != cfg.secret_broker.client_key.is_some() {
        return Err(LoadError::Validation(
            "secret_broker.client_cert and secret_broker.client_key must be set together".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config() {
        let yaml = r#"
engine:
  task_queue: slack
secret_broker:
  address: broker:14460
links:
  slack: abc123validtoken
"#;
        let cfg = load_from_str(yaml).unwrap();
        assert_eq!(cfg.engine.task_queue, "slack");
        assert_eq!(cfg.secret_broker.address, "broker:14460");
    }

    #[test]
    fn empty_document_is_default() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg, WorkerConfig::default());
    }

    #[test]
    fn missing_slack_link_is_accepted() {
        let cfg = load_from_str("links: {}\n").unwrap();
        assert!(cfg.links.slack.is_empty());
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = load_from_str("secret_broker:\n  timeout_ms: 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }

    #[test]
    fn empty_task_queue_rejected() {
        let err = load_from_str("engine:\n  task_queue: \"\"\n").unwrap_err();
        assert!(err.to_string().contains("task_queue"));
    }

    #[test]
    fn half_configured_client_identity_rejected() {
        let yaml = "secret_broker:\n  client_cert: /tmp/client.pem\n";
        let err = load_from_str(yaml).unwrap_err();
        assert!(err.to_string().contains("client_key"));
    }

    #[test]
    fn load_from_file_works() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "dev: true\nlinks:\n  slack: xyz\n").unwrap();
        let cfg = load_from_file(&path).unwrap();
        assert!(cfg.dev);
        assert_eq!(cfg.links.slack, "xyz");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(cfg, WorkerConfig::default());
    }

    #[test]
    fn default_path_is_under_platform_config_dir() {
        match (default_path(), dirs::config_dir()) {
            (Some(path), Some(dir)) => {
                assert!(path.starts_with(&dir));
                assert!(path.ends_with("courier/config.yaml"));
            }
            (None, None) => {}
            other => panic!("config dir and default path disagree: {other:?}"),
        }
    }
}

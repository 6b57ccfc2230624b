use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, LoadError, WorkerConfig};

#[derive(Debug, Parser)]
#[command(name = "courier-worker", version, about = "Activity worker for chat-platform integrations")]
pub struct Args {
    /// Configuration file; defaults to courier/config.yaml under the user config dir.
    #[arg(short, long, env = "COURIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Plaintext broker connections and verbose logs. Unsafe in production.
    #[arg(long, env = "COURIER_DEV")]
    pub dev: bool,

    #[arg(long, env = "COURIER_ENGINE_ADDRESS")]
    pub engine_address: Option<String>,

    #[arg(long, env = "COURIER_ENGINE_NAMESPACE")]
    pub engine_namespace: Option<String>,

    #[arg(long, env = "COURIER_TASK_QUEUE")]
    pub task_queue: Option<String>,

    #[arg(long, env = "COURIER_BROKER_ADDRESS")]
    pub broker_address: Option<String>,

    /// Secret broker link ID holding the Slack bot token.
    #[arg(long, env = "COURIER_LINK_SLACK")]
    pub link_slack: Option<String>,
}

impl Args {
    /// Loads the config file (missing file means defaults) and applies the
    /// flags on top of it.
    pub fn load_config(&self) -> Result<WorkerConfig, LoadError> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => match config::default_path() {
                Some(path) => config::load_or_default(&path)?,
                None => WorkerConfig::default(),
            },
        };
        self.apply(&mut cfg);
        config::validate(&cfg)?;
        Ok(cfg)
    }

    pub fn apply(&self, cfg: &mut WorkerConfig) {
        if self.dev {
            cfg.dev = true;
        }
        if let Some(v) = &self.engine_address {
            cfg.engine.address = v.clone();
        }
        if let Some(v) = &self.engine_namespace {
            cfg.engine.namespace = v.clone();
        }
        if let Some(v) = &self.task_queue {
            cfg.engine.task_queue = v.clone();
        }
        if let Some(v) = &self.broker_address {
            cfg.secret_broker.address = v.clone();
        }
        if let Some(v) = &self.link_slack {
            cfg.links.slack = v.clone();
        }
    }
}

mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(contents) => from_yaml(&contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}, using defaults", config_path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    if let Ok(port) = env::var("PORT") {
        config.server.port = parse_port(&port)?;
    }

    Ok(config)
}

fn from_yaml(contents: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(contents)?)
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .map_err(|_| Error::config(format!("invalid PORT value: {raw}")))
}

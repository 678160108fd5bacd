use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbit_core::NavigatorOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::events::AppEvent;
use async_channel::Sender;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub socket_path: PathBuf,
    pub scale: f64,
    pub more_label: String,
    pub reveal_on_veto: bool,
    pub escape_closes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/tmp/orbit.sock"),
            scale: 1.1025,
            more_label: "More".to_string(),
            reveal_on_veto: true,
            escape_closes: true,
        }
    }
}

impl Config {
    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            more_label: self.more_label.clone(),
            reveal_on_veto: self.reveal_on_veto,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid scale {0}, expected a positive number")]
    InvalidScale(f64),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orbit", "orbit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn build(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    let config: Config = builder
        .add_source(config::Environment::with_prefix("ORBIT"))
        .build()?
        .try_deserialize()?;

    if !(config.scale.is_finite() && config.scale > 0.0) {
        return Err(ConfigError::InvalidScale(config.scale));
    }
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;
    build(config::Config::builder().add_source(config::File::from(config_path).required(false)))
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Sends `AppEvent::ConfigReload` whenever the config file is written, created or removed.
/// Editors that replace the file atomically show up as create/remove pairs, so the
/// parent directory is watched rather than the file itself.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch(&tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch(tx: &Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let Some(config_dir) = config_path.parent() else {
        return Err(ConfigError::ConfigDirNotFound);
    };
    fs_err::create_dir_all(config_dir)?;

    let (events_tx, events) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = events_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = events.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Watch error: {}", e);
                continue;
            }
        };
        if !touches_config(&event, &config_path) {
            continue;
        }
        if tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
    Ok(())
}

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

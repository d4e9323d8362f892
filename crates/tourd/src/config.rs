use crate::events::AppEvent;
use crate::host::ProjectStore;
use async_channel::Sender;
use directories::ProjectDirs;
use mapnav::DEFAULT_SOCKET_PATH;
use mapnav::animation::PlaybackTiming;
use mapnav::collaborators::FlyOptions;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub countdown_from: u8,
    pub countdown_tick_ms: u64,
    pub reveal_pause_ms: u64,
    pub settle_delay_ms: u64,
    pub flight_ms: u64,
    pub ease_linearity: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        let timing = PlaybackTiming::default();
        Self {
            countdown_from: timing.countdown_from,
            countdown_tick_ms: timing.countdown_tick.as_millis() as u64,
            reveal_pause_ms: timing.reveal_pause.as_millis() as u64,
            settle_delay_ms: timing.settle_delay.as_millis() as u64,
            flight_ms: timing.flight.duration.as_millis() as u64,
            ease_linearity: timing.flight.ease_linearity,
        }
    }
}

impl PlaybackConfig {
    pub fn timing(&self) -> PlaybackTiming {
        PlaybackTiming {
            countdown_from: self.countdown_from,
            countdown_tick: Duration::from_millis(self.countdown_tick_ms),
            reveal_pause: Duration::from_millis(self.reveal_pause_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            flight: FlyOptions {
                duration: Duration::from_millis(self.flight_ms),
                ease_linearity: self.ease_linearity,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub ready: bool,
    /// Zoom level navigation steps are sized for.
    pub initial_zoom: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ready: true,
            initial_zoom: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub project: Option<PathBuf>,
    pub socket_path: PathBuf,
    pub playback: PlaybackConfig,
    pub camera: CameraConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: None,
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            playback: PlaybackConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "mapnav", "tourd").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Reads `path` (or the default config location) with `TOURD_*` overrides,
/// e.g. `TOURD_PLAYBACK__REVEAL_PAUSE_MS=500`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("TOURD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default(path: Option<&Path>) -> Config {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
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

/// Reloads the project into `store` whenever its file changes on disk.
pub async fn run_async_watcher(project_path: PathBuf, store: ProjectStore, tx: Sender<AppEvent>) {
    let watch_dir = match project_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch project directory: {}", e);
        return;
    }

    let file_name = project_path.file_name().map(|n| n.to_os_string());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event =
                    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
                let touches_project = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);

                if !(meaningful_event && touches_project) {
                    continue;
                }

                match store.reload(&project_path) {
                    Ok(()) => {
                        if tx.send(AppEvent::ProjectReload).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => log::error!("Failed to reload project: {}", e),
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(s: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(s, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_timing_matches_playback_defaults() {
        assert_eq!(Config::default().playback.timing(), PlaybackTiming::default());
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        assert_eq!(from_toml(DEFAULT_CONFIG), Config::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = from_toml(
            r#"
            project = "tour.json"

            [playback]
            reveal_pause_ms = 500

            [camera]
            ready = false
            "#,
        );

        assert_eq!(config.project, Some(PathBuf::from("tour.json")));
        assert_eq!(config.playback.reveal_pause_ms, 500);
        assert_eq!(config.playback.countdown_tick_ms, 1000);
        assert!(!config.camera.ready);
        assert_eq!(config.camera.initial_zoom, 12.0);
        assert_eq!(config.socket_path, PathBuf::from(DEFAULT_SOCKET_PATH));

        let timing = config.playback.timing();
        assert_eq!(timing.reveal_pause, Duration::from_millis(500));
    }
}

//! Application-level configuration loading: catalog source, snapshot storage, team
//! generation, lookup host and playback hints.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "HITSTER_HOST_CONFIG_PATH";
/// Where the snapshot file lands when the config does not say otherwise.
const DEFAULT_STORAGE_PATH: &str = "data/hitster-host-state.v2.json";
const DEFAULT_TEAM_COUNT: usize = 3;
const MIN_TEAM_COUNT: usize = 2;
const DEFAULT_TEAM_PREFIX: &str = "Team";
const DEFAULT_SEARCH_HOST: &str = "www.youtube.com";
const DEFAULT_PREVIEW_SECS: u64 = 60;

/// Backend used to keep the game snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// JSON document on disk.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    catalog_path: Option<PathBuf>,
    storage_kind: StorageKind,
    storage_path: PathBuf,
    team_count: usize,
    team_name_prefix: String,
    search_host: String,
    preview_secs: u64,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    /// Load the configuration stored at `path`.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        storage = ?app_config.storage_kind,
                        teams = app_config.team_count,
                        "loaded config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document; absent keys take their defaults.
    pub fn parse(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Catalog file to load instead of the embedded one.
    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    /// Selected snapshot backend.
    pub fn storage_kind(&self) -> StorageKind {
        self.storage_kind
    }

    /// Snapshot file used by the file backend.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Number of teams created when a teams game starts.
    pub fn team_count(&self) -> usize {
        self.team_count
    }

    /// Prefix of generated team names.
    pub fn team_name_prefix(&self) -> &str {
        &self.team_name_prefix
    }

    /// Host of the video search page used by the lookup action.
    pub fn search_host(&self) -> &str {
        &self.search_host
    }

    /// Seconds after which the host player should stop a preview.
    pub fn preview_secs(&self) -> u64 {
        self.preview_secs
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    catalog: RawCatalog,
    storage: RawStorage,
    teams: RawTeams,
    lookup: RawLookup,
    playback: RawPlayback,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCatalog {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStorage {
    kind: StorageKind,
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTeams {
    count: Option<usize>,
    name_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLookup {
    search_host: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlayback {
    preview_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let team_count = match value.teams.count {
            Some(count) if count < MIN_TEAM_COUNT => {
                warn!(
                    count,
                    min = MIN_TEAM_COUNT,
                    "team count too small; using the minimum"
                );
                MIN_TEAM_COUNT
            }
            Some(count) => count,
            None => DEFAULT_TEAM_COUNT,
        };

        Self {
            catalog_path: value.catalog.path,
            storage_kind: value.storage.kind,
            storage_path: value
                .storage
                .path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
            team_count,
            team_name_prefix: non_blank(value.teams.name_prefix)
                .unwrap_or_else(|| DEFAULT_TEAM_PREFIX.into()),
            search_host: non_blank(value.lookup.search_host)
                .unwrap_or_else(|| DEFAULT_SEARCH_HOST.into()),
            preview_secs: value.playback.preview_secs.unwrap_or(DEFAULT_PREVIEW_SECS),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

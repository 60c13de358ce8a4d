//! Typed configuration.
//!
//! Process settings come from environment variables and load once at
//! startup. Engine policy (levels per work type, dedup placement) comes
//! from an optional TOML file.

use crate::error::{Error, Result};
use crate::queue::{MAX_PRIORITY, Priority};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Config {
    pub log_level: String,
    pub engine_config: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let engine_config = match lookup("WORKQ_CONFIG") {
            Some(path) if path.trim().is_empty() => {
                return Err(Error::Config("WORKQ_CONFIG is set but empty".to_string()));
            }
            Some(path) => Some(PathBuf::from(path)),
            None => None,
        };

        Ok(Self {
            log_level: lookup("WORKQ_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            engine_config,
        })
    }

    /// The engine config named by `WORKQ_CONFIG`, or defaults.
    pub fn load_engine_config(&self) -> Result<EngineConfig> {
        match &self.engine_config {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::default()),
        }
    }
}

/// Top-level TOML layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineConfigFile {
    #[serde(default = "default_priority")]
    default_priority: Priority,
    #[serde(default)]
    dedup_to_end: bool,
    #[serde(default)]
    work_type: Vec<WorkTypeConfig>,
}

fn default_priority() -> Priority {
    MAX_PRIORITY
}

/// Dispatch policy for one work type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkTypeConfig {
    pub name: String,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub dedup_to_end: bool,
}

/// Engine policy.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Level for work with no explicit or per-type priority.
    pub default_priority: Priority,
    /// Send deduplicated work to the end of its level for every work type.
    pub dedup_to_end: bool,
    work_types: HashMap<String, WorkTypeConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_priority: MAX_PRIORITY,
            dedup_to_end: false,
            work_types: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read engine config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config(msg) => {
                Error::Config(format!("bad engine config {}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: EngineConfigFile =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;

        let mut work_types = HashMap::new();
        for work_type in file.work_type {
            if work_types.contains_key(&work_type.name) {
                return Err(Error::Config(format!(
                    "work type {} configured twice",
                    work_type.name
                )));
            }
            work_types.insert(work_type.name.clone(), work_type);
        }

        Ok(Self {
            default_priority: file.default_priority,
            dedup_to_end: file.dedup_to_end,
            work_types,
        })
    }

    pub fn work_type(&self, name: &str) -> Option<&WorkTypeConfig> {
        self.work_types.get(name)
    }

    /// Level for `work_type` when the submitter gave none.
    pub fn priority_for(&self, work_type: &str) -> Priority {
        self.work_type(work_type)
            .and_then(|w| w.priority)
            .unwrap_or(self.default_priority)
    }

    pub fn dedup_to_end_for(&self, work_type: &str) -> bool {
        self.dedup_to_end || self.work_type(work_type).is_some_and(|w| w.dedup_to_end)
    }

    /// Configured work types, sorted by name.
    pub fn work_types(&self) -> Vec<&WorkTypeConfig> {
        let mut types: Vec<_> = self.work_types.values().collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        types
    }
}

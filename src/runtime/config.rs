use crate::runtime::error::{AgoraError, AgoraResult};
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::{env, fs, path::Path};

pub const DEFAULT_MAX_DEPTH: usize = 1_000;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Deepest chain of nested sends before evaluation fails.
    pub max_depth: usize,
    /// Emit a `trace` event for every dispatch hit and miss.
    pub trace_dispatch: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            trace_dispatch: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: std::io::Error },
    #[error("Invalid engine configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value `{value}` for {variable}")]
    Env { variable: &'static str, value: String },
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            error,
        })?;
        Self::from_toml_str(&source)
    }

    /// Applies `AGORA_MAX_DEPTH` and `AGORA_TRACE_DISPATCH` on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(value) = env_value("AGORA_MAX_DEPTH") {
            self.max_depth = value.parse().map_err(|_| ConfigError::Env {
                variable: "AGORA_MAX_DEPTH",
                value,
            })?;
        }
        if let Some(value) = env_value("AGORA_TRACE_DISPATCH") {
            self.trace_dispatch = match value.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Env {
                        variable: "AGORA_TRACE_DISPATCH",
                        value,
                    })
                }
            };
        }
        Ok(self)
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

thread_local! {
    static CONFIG: RefCell<EngineConfig> = RefCell::new(EngineConfig::default());
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

pub fn install(config: EngineConfig) {
    CONFIG.with(|current| *current.borrow_mut() = config);
}

pub fn current() -> EngineConfig {
    CONFIG.with(|current| current.borrow().clone())
}

/// Counts nested sends on this thread; dropping the guard leaves the level.
pub struct DepthGuard(());

impl DepthGuard {
    pub fn enter() -> AgoraResult<DepthGuard> {
        let limit = CONFIG.with(|current| current.borrow().max_depth);
        DEPTH.with(|depth| {
            let next = depth.get() + 1;
            if next > limit {
                return Err(AgoraError::program(format!(
                    "maximum evaluation depth of {limit} nested sends exceeded"
                )));
            }
            depth.set(next);
            Ok(DepthGuard(()))
        })
    }

    pub fn level() -> usize {
        DEPTH.with(Cell::get)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = EngineConfig::from_toml_str("max_depth = 64\n").unwrap();
        assert_eq!(config.max_depth, 64);
        assert!(!config.trace_dispatch);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(EngineConfig::from_toml_str("depth = 3\n").is_err());
    }

    #[test]
    fn depth_guard_enforces_the_installed_limit() {
        install(EngineConfig {
            max_depth: 2,
            trace_dispatch: false,
        });
        let first = DepthGuard::enter().unwrap();
        let second = DepthGuard::enter().unwrap();
        assert!(DepthGuard::enter().is_err());
        assert_eq!(DepthGuard::level(), 2);
        drop(second);
        drop(first);
        assert_eq!(DepthGuard::level(), 0);
        install(EngineConfig::default());
    }
}

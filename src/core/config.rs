//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars (`.env` included) → CLI flags.
//!
//! Config lives at `~/.exitto/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::env_store::TORRC_PATH_KEY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExittoConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub torrc_file: Option<String>,
    pub env_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_LOG_FILE: &str = "exitto.log";
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options except the torrc path)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// `None` until the user points the app at a torrc.
    pub torrc_file: Option<PathBuf>,
    pub env_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
}

/// Overrides taken from the command line (None = flag not given).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub torrc_file: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.exitto/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".exitto").join("config.toml"))
}

/// Load config from `~/.exitto/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ExittoConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ExittoConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ExittoConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ExittoConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ExittoConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# exitto Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars / .env → CLI flags.

# [general]
# torrc_file = "/etc/tor/torrc"      # Or set TORRC_FILE_PATH (env or .env)
# env_file = ".env"                  # Where the chosen torrc path is remembered

# [logging]
# file = "exitto.log"
# level = "debug"                    # "off", "error", "warn", "info", "debug", "trace"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ExittoConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, std::env::var(TORRC_PATH_KEY).ok())
}

/// [`resolve`] with the `TORRC_FILE_PATH` value passed in explicitly.
pub fn resolve_with_env(
    config: &ExittoConfig,
    cli: &CliOverrides,
    env_torrc: Option<String>,
) -> ResolvedConfig {
    // Torrc: CLI → env → config; empty strings mean "not configured"
    let torrc_file = cli
        .torrc_file
        .clone()
        .or_else(|| non_empty(env_torrc).map(PathBuf::from))
        .or_else(|| non_empty(config.general.torrc_file.clone()).map(PathBuf::from));

    // Env file: CLI → config → default
    let env_file = cli
        .env_file
        .clone()
        .or_else(|| config.general.env_file.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));

    let log_file = config
        .logging
        .file
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    let log_level = match config.logging.level.as_deref() {
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log level {:?}, using {}", level, DEFAULT_LOG_LEVEL);
            DEFAULT_LOG_LEVEL
        }),
        None => DEFAULT_LOG_LEVEL,
    };

    ResolvedConfig {
        torrc_file,
        env_file,
        log_file,
        log_level,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = ExittoConfig::default();
        assert!(config.general.torrc_file.is_none());
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = ExittoConfig::default();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), None);
        assert_eq!(resolved.torrc_file, None);
        assert_eq!(resolved.env_file, PathBuf::from(DEFAULT_ENV_FILE));
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ExittoConfig {
            general: GeneralConfig {
                torrc_file: Some("/etc/tor/torrc".to_string()),
                env_file: Some("/var/lib/exitto/.env".to_string()),
            },
            logging: LoggingConfig {
                file: Some("/tmp/exitto.log".to_string()),
                level: Some("warn".to_string()),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), None);
        assert_eq!(resolved.torrc_file, Some(PathBuf::from("/etc/tor/torrc")));
        assert_eq!(resolved.env_file, PathBuf::from("/var/lib/exitto/.env"));
        assert_eq!(resolved.log_file, PathBuf::from("/tmp/exitto.log"));
        assert_eq!(resolved.log_level, log::LevelFilter::Warn);
    }

    #[test]
    fn test_resolve_env_wins_over_config() {
        let config = ExittoConfig {
            general: GeneralConfig {
                torrc_file: Some("/etc/tor/torrc".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(
            &config,
            &CliOverrides::default(),
            Some("/home/me/torrc".to_string()),
        );
        assert_eq!(resolved.torrc_file, Some(PathBuf::from("/home/me/torrc")));
    }

    #[test]
    fn test_resolve_empty_env_value_is_unset() {
        let config = ExittoConfig {
            general: GeneralConfig {
                torrc_file: Some("/etc/tor/torrc".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), Some(String::new()));
        assert_eq!(resolved.torrc_file, Some(PathBuf::from("/etc/tor/torrc")));
    }

    #[test]
    fn test_resolve_cli_wins() {
        let cli = CliOverrides {
            torrc_file: Some(PathBuf::from("./torrc.fortest")),
            env_file: Some(PathBuf::from("./test.env")),
        };
        let resolved = resolve_with_env(
            &ExittoConfig::default(),
            &cli,
            Some("/home/me/torrc".to_string()),
        );
        assert_eq!(resolved.torrc_file, Some(PathBuf::from("./torrc.fortest")));
        assert_eq!(resolved.env_file, PathBuf::from("./test.env"));
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = ExittoConfig {
            logging: LoggingConfig {
                level: Some("chatty".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), None);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[general]
torrc_file = "/etc/tor/torrc"
"#;
        let config: ExittoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.torrc_file.as_deref(), Some("/etc/tor/torrc"));
        assert!(config.general.env_file.is_none());
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_full_toml_parses() {
        let toml_str = r#"
[general]
torrc_file = "/etc/tor/torrc"
env_file = ".env.tor"

[logging]
file = "/var/log/exitto.log"
level = "info"
"#;
        let config: ExittoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.env_file.as_deref(), Some(".env.tor"));
        assert_eq!(config.logging.file.as_deref(), Some("/var/log/exitto.log"));
        assert_eq!(config.logging.level.as_deref(), Some("info"));
    }
}

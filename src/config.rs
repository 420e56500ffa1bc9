// Configuration management for the default gateway fact
// Supports CLI arguments, config file (TOML), and environment variables

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

use crate::error::{AppError, AppResult};
use crate::facts::default_gateway::{DEFAULT_IP_PATH, default_ip_args};

const DEFAULT_CONFIG_FILE: &str = "default-gateway.toml";

/// Print the default IPv4 gateway of this host, as found in `ip route ls`
#[derive(Parser, Debug, Clone)]
#[command(name = "default-gateway-fact")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the `ip` executable
    #[arg(long, env = "DGW_IP_PATH")]
    pub ip_path: Option<PathBuf>,

    /// Seconds to wait for the routing table command
    #[arg(short, long, env = "DGW_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, env = "DGW_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(short, long, env = "DGW_LOG")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "DGW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Read routing table text from stdin instead of running the command
    #[arg(long)]
    pub stdin: bool,

    /// Resolve even when the kernel is not Linux
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration file structure (TOML format)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Routing table command settings
    #[serde(default)]
    pub command: CommandConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Path to the `ip` executable
    #[serde(default = "default_ip_path")]
    pub path: PathBuf,

    /// Arguments passed to it
    #[serde(default = "default_ip_args")]
    pub args: Vec<String>,

    /// Seconds before the command is killed
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_ip_path() -> PathBuf {
    PathBuf::from(DEFAULT_IP_PATH)
}
fn default_timeout_seconds() -> u64 {
    5
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        CommandConfig {
            path: default_ip_path(),
            args: default_ip_args(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Merged configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub ip_path: PathBuf,
    pub ip_args: Vec<String>,
    pub timeout: Duration,
    pub format: OutputFormat,
    pub log_level: Level,
    pub read_stdin: bool,
    pub force: bool,
}

impl Config {
    /// Load configuration from all sources (CLI args, config file, defaults)
    /// Priority: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> anyhow::Result<Self> {
        let cli_args = CliArgs::parse();
        let config_file = load_config_file(cli_args.config.as_deref())?;
        Ok(Self::merge(cli_args, config_file)?)
    }

    fn merge(cli_args: CliArgs, config_file: ConfigFile) -> AppResult<Self> {
        let timeout_seconds = cli_args
            .timeout
            .unwrap_or(config_file.command.timeout_seconds);
        if timeout_seconds == 0 {
            return Err(AppError::Config("timeout must be at least 1 second".to_string()));
        }

        let level = cli_args.log_level.unwrap_or(config_file.logging.level);

        Ok(Config {
            ip_path: cli_args.ip_path.unwrap_or(config_file.command.path),
            ip_args: config_file.command.args,
            timeout: Duration::from_secs(timeout_seconds),
            format: cli_args.format.unwrap_or(config_file.output.format),
            log_level: parse_log_level(&level)?,
            read_stdin: cli_args.stdin,
            force: cli_args.force,
        })
    }
}

// Logging isn't initialized yet when this runs, so nothing is traced here
fn load_config_file(explicit: Option<&Path>) -> AppResult<ConfigFile> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.exists() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let config_content = std::fs::read_to_string(&path)?;
    toml::from_str::<ConfigFile>(&config_content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
}

fn parse_log_level(level_str: &str) -> AppResult<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(AppError::Config(format!("Invalid log level: {}", level_str))),
    }
}

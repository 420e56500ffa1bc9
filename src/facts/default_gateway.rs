// default_gateway fact: run `ip route ls` and pick the gateway out of the default route

use std::path::PathBuf;

use crate::error::AppError;
use crate::routes::command::{CommandRunner, command_available};
use crate::routes::parser::extract_default_gateway;
use crate::routes::GatewayAddress;

pub const FACT_NAME: &str = "default_gateway";

pub const DEFAULT_IP_PATH: &str = "/sbin/ip";

pub fn default_ip_args() -> Vec<String> {
    vec!["route".to_string(), "ls".to_string()]
}

/// Outcome of one resolution attempt.
///
/// Only `Found` carries a fact value; the other states exist for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(GatewayAddress),
    NoDefaultRoute,
    CommandUnavailable(PathBuf),
    CommandFailed(String),
}

impl Resolution {
    pub fn into_value(self) -> Option<GatewayAddress> {
        match self {
            Resolution::Found(address) => Some(address),
            _ => None,
        }
    }
}

/// Resolve the fact from routing table text obtained elsewhere
pub fn resolve_from_text(routing_table: &str) -> Resolution {
    match extract_default_gateway(routing_table) {
        Some(address) => Resolution::Found(address),
        None => Resolution::NoDefaultRoute,
    }
}

pub struct DefaultGatewayResolver<R> {
    runner: R,
    ip_path: PathBuf,
    args: Vec<String>,
}

impl<R: CommandRunner> DefaultGatewayResolver<R> {
    pub fn new(runner: R, ip_path: PathBuf, args: Vec<String>) -> Self {
        DefaultGatewayResolver {
            runner,
            ip_path,
            args,
        }
    }

    /// Query the routing table and extract the default gateway.
    ///
    /// Never fails: a missing executable or a failing command is reported
    /// as a resolution state and yields no fact value.
    pub async fn resolve(&self) -> Resolution {
        if !command_available(&self.ip_path) {
            let err = AppError::CommandNotFound(self.ip_path.clone());
            tracing::info!("{}; {} not resolved", err, FACT_NAME);
            return Resolution::CommandUnavailable(self.ip_path.clone());
        }

        let output = match self
            .runner
            .run_and_capture_output(&self.ip_path, &self.args)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("{} ({})", e, e.user_message());
                return Resolution::CommandFailed(e.to_string());
            }
        };

        let resolution = resolve_from_text(&output);
        if resolution == Resolution::NoDefaultRoute {
            tracing::info!("No default route in {} output", self.ip_path.display());
        }
        resolution
    }
}

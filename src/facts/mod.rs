// Facts module - platform confinement and fact reporting

pub mod default_gateway;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Kernel family of the host, as far as fact confinement cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kernel {
    Linux,
    Darwin,
    Windows,
    FreeBsd,
    Other(String),
}

impl Kernel {
    /// Map a `std::env::consts::OS` style name to a kernel
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" | "android" => Kernel::Linux,
            "macos" | "ios" => Kernel::Darwin,
            "windows" => Kernel::Windows,
            "freebsd" => Kernel::FreeBsd,
            other => Kernel::Other(other.to_string()),
        }
    }

    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kernel::Linux => f.write_str("Linux"),
            Kernel::Darwin => f.write_str("Darwin"),
            Kernel::Windows => f.write_str("windows"),
            Kernel::FreeBsd => f.write_str("FreeBSD"),
            Kernel::Other(name) => f.write_str(name),
        }
    }
}

/// The default gateway fact is only provided on Linux kernels.
pub fn is_applicable(kernel: &Kernel) -> bool {
    matches!(kernel, Kernel::Linux)
}

/// Resolved facts for one host, keyed by fact name
#[derive(Debug, Clone, Serialize)]
pub struct FactReport {
    pub hostname: String,
    pub timestamp: String,
    pub facts: BTreeMap<String, Option<String>>,
}

impl FactReport {
    pub fn new() -> Self {
        FactReport {
            hostname: get_hostname(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            facts: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: Option<String>) {
        self.facts.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.facts.get(name).and_then(|v| v.as_deref())
    }
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

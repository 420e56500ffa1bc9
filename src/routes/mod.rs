// Routes module - default route data model, routing table parsing and command execution

pub mod command;
pub mod parser;

use std::fmt;

/// Dotted-quad gateway address as it appeared in the routing table.
///
/// Only the lexical shape is checked by the parser, so octets above 255 are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GatewayAddress(String);

impl GatewayAddress {
    pub(crate) fn new(address: impl Into<String>) -> Self {
        GatewayAddress(address.into())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GatewayAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `default via <gateway> dev <device> ...` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultRouteRecord {
    pub gateway: GatewayAddress,
    pub device: String,
    /// Everything after the separator that follows the device name
    pub remainder: String,
}

// Default gateway extraction from `ip route ls` output

use regex::Regex;
use std::sync::LazyLock;

use super::{DefaultRouteRecord, GatewayAddress};

// The device name must be followed by a space; a line ending right after it does not match.
static DEFAULT_ROUTE_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^default via ([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+) dev ([a-z0-9]+) (.*)$").ok()
});

/// Parse a single routing table line as a default route record.
///
/// Returns `None` for anything that isn't shaped like
/// `default via <a.b.c.d> dev <device> <more>`.
pub fn parse_default_route(line: &str) -> Option<DefaultRouteRecord> {
    let regex = DEFAULT_ROUTE_REGEX.as_ref()?;
    let captures = regex.captures(line)?;

    Some(DefaultRouteRecord {
        gateway: GatewayAddress::new(&captures[1]),
        device: captures[2].to_string(),
        remainder: captures[3].to_string(),
    })
}

/// Find the default gateway in routing table output.
///
/// Lines are scanned in order and the first default route wins. Lines that
/// don't match are skipped, so malformed input just yields `None`.
pub fn extract_default_gateway(routing_table: &str) -> Option<GatewayAddress> {
    routing_table
        .split('\n')
        .find_map(parse_default_route)
        .map(|record| {
            tracing::debug!(
                "Default route via {} on {} ({})",
                record.gateway,
                record.device,
                record.remainder
            );
            record.gateway
        })
}

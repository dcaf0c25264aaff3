//! Provides the host discovery strategies used by the scanners
//!
//! Two capabilities are exposed:
//! - [`HostProbe`]: decide liveness of a single address (ICMP echo via `ping`)
//! - [`DiscoveryTool`]: produce a structured report for a whole subnet in a
//!   single invocation (`nmap`)

use std::{
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

use crate::{error::Result, scanners::HostRecord, targets::subnet::Subnet};

pub mod nmap;
pub mod ping;

/// The default per-probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
/// The result of probing a single address
///
/// Only [`ProbeOutcome::Live`] reaches the results channel. `Down` and
/// `Error` are indistinguishable to consumers and are only logged.
pub enum ProbeOutcome {
    /// The host answered
    Live(HostRecord),
    /// The host did not answer within the timeout
    Down,
    /// The probe itself could not be carried out
    Error(String),
}

/// Trait describing a single-address liveness probe
pub trait HostProbe: Send + Sync {
    /// Should probe the address and report the outcome. Implementations must
    /// not panic or block past their own timeout
    fn probe(&self, ip: Ipv4Addr) -> ProbeOutcome;
}

/// Trait describing a batched discovery tool run once per subnet
pub trait DiscoveryTool: Send + Sync {
    /// Should run discovery against the subnet and return the tool's raw
    /// structured report
    fn run(&self, subnet: &Subnet) -> Result<String>;
}

/// Performs a reverse DNS lookup for the address. Lookups that fail or only
/// echo the address back yield None
pub fn lookup_hostname(ip: Ipv4Addr) -> Option<String> {
    log::debug!("looking up hostname for {}", ip);

    dns_lookup::lookup_addr(&IpAddr::V4(ip))
        .ok()
        .and_then(|name| resolved_name(ip, name))
}

// resolvers answer with the dotted address when no PTR record exists
fn resolved_name(ip: Ipv4Addr, name: String) -> Option<String> {
    if name.is_empty() || name == ip.to_string() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
#[path = "./probe_mocks.rs"]
#[doc(hidden)]
pub mod mocks;

#[cfg(test)]
#[path = "./probe_tests.rs"]
mod tests;

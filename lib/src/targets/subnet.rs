//! Provides the IPv4 subnet target and its address enumeration

use std::{fmt, net, str::FromStr, sync::Arc};

use crate::error::{Result, SweepError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Represents an IPv4 CIDR block to sweep
///
/// Only the network value and prefix are stored. Addresses are generated
/// on demand so that large blocks (a /16 holds 65536 addresses) never need to
/// be materialized in memory.
///
/// Unlike [`ipnet::Ipv4Net::hosts`], enumeration includes both the network
/// and the broadcast address.
///
/// # Errors
///
/// Returns an error if the input is not valid IPv4 CIDR notation
///
/// # Examples
///
/// ```
/// # use hostsweep_lib::targets::subnet::Subnet;
/// let subnet = Subnet::new("192.168.35.0/24").unwrap();
/// assert_eq!(subnet.len(), 256);
///
/// let first = subnet.addresses().next().unwrap();
/// assert_eq!(first.to_string(), "192.168.35.0");
/// ```
pub struct Subnet {
    net: ipnet::Ipv4Net,
}

impl Subnet {
    /// Returns a new shareable Subnet parsed from CIDR notation. Host bits
    /// are masked off, so "192.168.35.17/24" yields "192.168.35.0/24"
    pub fn new(cidr: &str) -> Result<Arc<Self>> {
        Ok(Arc::new(cidr.parse()?))
    }

    /// The network (first) address of the block
    pub fn network(&self) -> net::Ipv4Addr {
        self.net.network()
    }

    /// The broadcast (last) address of the block
    pub fn broadcast(&self) -> net::Ipv4Addr {
        self.net.broadcast()
    }

    /// The prefix length of the block
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }

    /// Returns the number of addresses in the block, 2^(32 - prefix)
    pub fn len(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix_len()))
    }

    /// A CIDR block always contains at least one address
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if the address falls within this block
    pub fn contains(&self, ip: net::Ipv4Addr) -> bool {
        self.net.contains(&ip)
    }

    /// Returns an iterator over every address in the block, in increasing
    /// order from the network address to the broadcast address. Each call
    /// starts a fresh iteration
    pub fn addresses(&self) -> Addresses {
        Addresses {
            subnet: *self,
            next: Some(u32::from(self.network())),
            remaining: self.len(),
        }
    }

    /// Loops over all addresses in the block, stopping at the first error
    /// returned by the callback
    pub fn lazy_loop<F: FnMut(net::Ipv4Addr) -> Result<()>>(
        &self,
        mut cb: F,
    ) -> Result<()> {
        for ip in self.addresses() {
            cb(ip)?;
        }
        Ok(())
    }
}

impl FromStr for Subnet {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self> {
        let net = ipnet::Ipv4Net::from_str(s.trim())
            .map_err(|e| SweepError::from_ipnet_addr_parse_error(s, e))?;

        Ok(Self { net: net.trunc() })
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len())
    }
}

#[derive(Debug, Clone)]
/// Ordered iterator over the addresses of a [`Subnet`]
pub struct Addresses {
    subnet: Subnet,
    next: Option<u32>,
    remaining: u64,
}

impl Iterator for Addresses {
    type Item = net::Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let ip = net::Ipv4Addr::from(current);

        if !self.subnet.contains(ip) {
            self.next = None;
            self.remaining = 0;
            return None;
        }

        // carries into the higher-order octets; stops once we step past the
        // block or past 255.255.255.255
        self.next = current
            .checked_add(1)
            .filter(|n| self.subnet.contains(net::Ipv4Addr::from(*n)));
        self.remaining = self.remaining.saturating_sub(1);

        Some(ip)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Addresses {}

#[cfg(test)]
#[path = "./subnet_tests.rs"]
mod tests;

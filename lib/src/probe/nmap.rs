//! Provides a [`DiscoveryTool`] backed by `nmap` along with a parser for its
//! XML report

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use std::{net::Ipv4Addr, process::Command};

use crate::{
    error::{Result, SweepError},
    scanners::HostRecord,
    targets::subnet::Subnet,
};

use super::DiscoveryTool;

/// The default nmap executable
pub const DEFAULT_NMAP_PROGRAM: &str = "nmap";

/// Host discovery with OS fingerprinting, XML report on stdout
pub const NMAP_ARGS: [&str; 5] = ["-O", "-sP", "--osscan-guess", "-oX", "-"];

/// Runs nmap once against an entire subnet
#[derive(Debug, Clone)]
pub struct Nmap {
    program: String,
}

impl Nmap {
    /// Returns a new Nmap tool invoking the given executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Nmap {
    fn default() -> Self {
        Self::new(DEFAULT_NMAP_PROGRAM)
    }
}

impl DiscoveryTool for Nmap {
    fn run(&self, subnet: &Subnet) -> Result<String> {
        log::debug!("running {} {:?} {}", self.program, NMAP_ARGS, subnet);

        let output = Command::new(&self.program)
            .args(NMAP_ARGS)
            .arg(subnet.to_string())
            .output()
            .map_err(|e| SweepError::from_tool_error(&self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SweepError::from_tool_error(
                &self.program,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| SweepError::ToolOutputParse(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// An address entry of an nmap host
pub struct NmapAddress {
    /// The address text
    pub addr: String,
    /// The address type i.e. "ipv4", "ipv6", "mac"
    pub addr_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A host entry of an nmap XML report
pub struct NmapHost {
    /// The reported status i.e. "up", "down"
    pub state: String,
    /// Addresses in document order
    pub addresses: Vec<NmapAddress>,
    /// Hostnames in document order
    pub hostnames: Vec<String>,
    /// OS match names, most confident first
    pub os_matches: Vec<String>,
}

impl NmapHost {
    /// Returns true if nmap reported this host as up
    pub fn is_up(&self) -> bool {
        self.state == "up"
    }

    /// Returns the first valid IPv4 address of the host
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        self.addresses
            .iter()
            .filter(|a| a.addr_type == "ipv4")
            .find_map(|a| a.addr.parse().ok())
    }

    /// Converts an up host into a [`HostRecord`] using its first IPv4
    /// address, first hostname and first OS match. Hosts that are not up or
    /// carry no IPv4 address yield None
    pub fn into_record(self) -> Option<HostRecord> {
        if !self.is_up() {
            return None;
        }

        let ip = self.ipv4()?;

        Some(HostRecord {
            ip,
            hostname: self.hostnames.into_iter().next(),
            os: self.os_matches.into_iter().next(),
        })
    }
}

fn attribute(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr =
            attr.map_err(|err| SweepError::ToolOutputParse(err.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn apply_element(e: &BytesStart, host: &mut NmapHost) -> Result<()> {
    match e.name().as_ref() {
        b"status" => {
            host.state = attribute(e, b"state")?.unwrap_or_default();
        }
        b"address" => {
            host.addresses.push(NmapAddress {
                addr: attribute(e, b"addr")?.unwrap_or_default(),
                addr_type: attribute(e, b"addrtype")?.unwrap_or_default(),
            });
        }
        b"hostname" => {
            if let Some(name) = attribute(e, b"name")? {
                host.hostnames.push(name);
            }
        }
        b"osmatch" => {
            if let Some(name) = attribute(e, b"name")? {
                host.os_matches.push(name);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parses an nmap XML report into its host entries
///
/// # Errors
///
/// Returns [`SweepError::ToolOutputParse`] if the document is malformed,
/// truncated, or has no `nmaprun` root element
///
/// # Examples
///
/// ```
/// # use hostsweep_lib::probe::nmap::parse_report;
/// let xml = r#"<nmaprun>
///   <host>
///     <status state="up"/>
///     <address addr="192.168.35.1" addrtype="ipv4"/>
///   </host>
/// </nmaprun>"#;
///
/// let hosts = parse_report(xml).unwrap();
/// assert_eq!(hosts.len(), 1);
/// assert!(hosts[0].is_up());
/// ```
pub fn parse_report(xml: &str) -> Result<Vec<NmapHost>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut hosts = Vec::new();
    let mut current: Option<NmapHost> = None;
    let mut saw_root = false;
    let mut depth: usize = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match e.name().as_ref() {
                    b"nmaprun" => saw_root = true,
                    b"host" => current = Some(NmapHost::default()),
                    _ => {
                        if let Some(host) = current.as_mut() {
                            apply_element(&e, host)?;
                        }
                    }
                }
            }
            Event::Empty(e) => match e.name().as_ref() {
                b"nmaprun" => saw_root = true,
                b"host" => hosts.push(NmapHost::default()),
                _ => {
                    if let Some(host) = current.as_mut() {
                        apply_element(&e, host)?;
                    }
                }
            },
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if e.name().as_ref() == b"host" {
                    if let Some(host) = current.take() {
                        hosts.push(host);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(SweepError::ToolOutputParse(
            "missing nmaprun element".to_string(),
        ));
    }

    if depth != 0 {
        return Err(SweepError::ToolOutputParse(
            "report ended before all elements were closed".to_string(),
        ));
    }

    Ok(hosts)
}

#[cfg(test)]
#[path = "./nmap_tests.rs"]
mod tests;

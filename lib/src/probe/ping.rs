//! Provides a [`HostProbe`] that shells out to the system `ping` executable

use derive_builder::Builder;
use std::{
    net::Ipv4Addr,
    process::{Command, Output, Stdio},
    thread,
    time::{Duration, Instant},
};

use crate::{
    error::{Result, SweepError},
    scanners::HostRecord,
};

use super::{DEFAULT_PROBE_TIMEOUT, HostProbe, ProbeOutcome, lookup_hostname};

/// The default ping executable
pub const DEFAULT_PING_PROGRAM: &str = "ping";

/// Marker present in ping output only when an echo reply arrived
pub const ROUND_TRIP_INDICATOR: &str = "ttl=";

// extra time granted to the child past its own wait bound before it is killed
const PROCESS_GRACE: Duration = Duration::from_millis(1000);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Data structure representing a one-shot ICMP echo probe
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Ping {
    /// Executable to invoke
    #[builder(default = "DEFAULT_PING_PROGRAM.to_string()")]
    program: String,
    /// How long to wait for an echo reply
    #[builder(default = "DEFAULT_PROBE_TIMEOUT")]
    timeout: Duration,
    /// Whether to include reverse DNS lookups for live hosts
    #[builder(default)]
    include_host_names: bool,
}

impl Ping {
    /// Returns builder for Ping
    pub fn builder() -> PingBuilder {
        PingBuilder::default()
    }

    #[cfg(windows)]
    fn args(&self, ip: Ipv4Addr) -> Vec<String> {
        let millis = self.timeout.as_millis().max(1);
        vec![
            "-n".to_string(),
            "1".to_string(),
            "-w".to_string(),
            millis.to_string(),
            ip.to_string(),
        ]
    }

    // macOS takes -W in milliseconds
    #[cfg(target_os = "macos")]
    fn args(&self, ip: Ipv4Addr) -> Vec<String> {
        let millis = self.timeout.as_millis().max(1);
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            millis.to_string(),
            ip.to_string(),
        ]
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    fn args(&self, ip: Ipv4Addr) -> Vec<String> {
        let secs = self.timeout.as_secs().max(1);
        vec![
            "-c".to_string(),
            "1".to_string(),
            "-W".to_string(),
            secs.to_string(),
            ip.to_string(),
        ]
    }

    fn run(&self, ip: Ipv4Addr) -> Result<Output> {
        let mut child = Command::new(&self.program)
            .args(self.args(ip))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SweepError::from_tool_error(&self.program, e))?;

        let deadline = Instant::now() + self.timeout + PROCESS_GRACE;

        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SweepError::from_tool_error(
                        &self.program,
                        format!("timed out probing {}", ip),
                    ));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(SweepError::from_tool_error(&self.program, e));
                }
            }
        }

        child
            .wait_with_output()
            .map_err(|e| SweepError::from_tool_error(&self.program, e))
    }
}

/// Returns true if the ping output reports a round trip
pub fn is_echo_reply(stdout: &[u8]) -> bool {
    String::from_utf8_lossy(stdout)
        .to_lowercase()
        .contains(ROUND_TRIP_INDICATOR)
}

impl HostProbe for Ping {
    fn probe(&self, ip: Ipv4Addr) -> ProbeOutcome {
        let output = match self.run(ip) {
            Ok(output) => output,
            Err(e) => return ProbeOutcome::Error(e.to_string()),
        };

        if !output.status.success() || !is_echo_reply(&output.stdout) {
            return ProbeOutcome::Down;
        }

        let hostname = if self.include_host_names {
            lookup_hostname(ip)
        } else {
            None
        };

        ProbeOutcome::Live(HostRecord {
            ip,
            hostname,
            os: None,
        })
    }
}

#[cfg(test)]
#[path = "./ping_tests.rs"]
mod tests;

//! Provides data structures and implementations for sweeping a subnet
//!
//! This includes:
//! - ICMP sweeping (one bounded-concurrency `ping` per address)
//! - nmap sweeping (one batched discovery run per subnet)
//! - Collecting the live hosts reported by either

#[cfg(test)]
use mockall::automock;

use serde::{Deserialize, Serialize};
use std::{
    net::Ipv4Addr,
    sync::mpsc::{Receiver, RecvError, RecvTimeoutError},
    thread::JoinHandle,
    time::Duration,
};

use crate::error::{Result, SweepError};

/// The default number of concurrent probes for the ICMP scanner
pub const DEFAULT_CONCURRENCY: usize = 64;

// how often the collector checks whether the scan thread exited early
const COLLECT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Data structure representing a live host
pub struct HostRecord {
    /// IPv4 of the host
    pub ip: Ipv4Addr,
    /// First known hostname of the host
    pub hostname: Option<String>,
    /// Best OS guess for the host
    pub os: Option<String>,
}

#[derive(Debug)]
/// Data structure representing a message that an address is being probed
pub struct Probing {
    /// IPv4 being probed
    pub ip: Ipv4Addr,
}

#[derive(Debug)]
/// Generic enum representing the various kinds of sweep messages over the
/// mpsc channel
pub enum ScanMessage {
    /// Indicates that every dispatched probe has finished. Sent exactly once
    Done,
    /// Sent to inform that an address is about to be probed
    Info(Probing),
    /// Sent whenever a host is found to be live
    Live(HostRecord),
}

#[cfg_attr(test, automock)]
/// Trait used by all scanners
pub trait Scanner: Sync + Send {
    /// Performs the sweep in a background thread, reporting over the
    /// scanner's notifier and finishing with [`ScanMessage::Done`]
    fn scan(&self) -> Result<JoinHandle<Result<()>>>;
}

// returns true once the scanner has signalled Done
fn record_message(msg: ScanMessage, results: &mut Vec<HostRecord>) -> bool {
    match msg {
        ScanMessage::Done => {
            log::debug!("sweep complete");
            true
        }
        ScanMessage::Info(probing) => {
            log::debug!("probing {}", probing.ip);
            false
        }
        ScanMessage::Live(record) => {
            log::debug!("received live host: {:?}", record);
            results.push(record);
            false
        }
    }
}

/// Starts the scanner and gathers every live host it reports, in arrival
/// order, until it signals [`ScanMessage::Done`]
///
/// No deduplication is performed. Errors from the scan thread are returned
/// after the channel has been drained.
///
/// # Errors
///
/// Returns the scanner's error if it failed to start or failed mid-sweep, or
/// a thread error if the scan thread panicked. A scan thread that ends
/// without signalling [`ScanMessage::Done`] yields
/// [`SweepError::ChannelReceive`] rather than a partial result.
pub fn collect(
    scanner: &dyn Scanner,
    rx: &Receiver<ScanMessage>,
) -> Result<Vec<HostRecord>> {
    let mut results: Vec<HostRecord> = Vec::new();
    let mut done = false;

    let handle = scanner.scan()?;

    while !done {
        match rx.recv_timeout(COLLECT_POLL_INTERVAL) {
            Ok(msg) => done = record_message(msg, &mut results),
            Err(RecvTimeoutError::Timeout) => {
                if !handle.is_finished() {
                    continue;
                }
                // the scan thread has exited, anything it reported is
                // already queued
                while let Ok(msg) = rx.try_recv() {
                    if record_message(msg, &mut results) {
                        done = true;
                        break;
                    }
                }
                break;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    handle.join()??;

    if !done {
        log::warn!(
            "sweep ended without completion signal after {} live hosts",
            results.len()
        );
        return Err(SweepError::ChannelReceive(RecvError));
    }

    Ok(results)
}

pub mod icmp_scanner;
pub mod nmap_scanner;

#[cfg(test)]
#[path = "./scanners_tests.rs"]
mod tests;

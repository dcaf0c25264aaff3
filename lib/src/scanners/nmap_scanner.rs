//! Provides Scanner implementation for nmap discovery sweeping

use derive_builder::Builder;
use std::{
    sync::{Arc, mpsc},
    thread::{self, JoinHandle},
};

use crate::{
    error::{Result, SweepError},
    probe::{DiscoveryTool, nmap::parse_report},
    targets::subnet::Subnet,
};

use super::{ScanMessage, Scanner};

/// Data structure representing an nmap scanner
#[derive(Clone, Builder)]
#[builder(setter(into))]
pub struct NmapScanner {
    /// Subnet handed to the discovery tool in a single invocation
    subnet: Arc<Subnet>,
    /// Tool producing the XML report
    tool: Arc<dyn DiscoveryTool>,
    /// Channel for sending sweep results and status messages
    notifier: mpsc::Sender<ScanMessage>,
}

impl NmapScanner {
    /// Returns builder for NmapScanner
    pub fn builder() -> NmapScannerBuilder {
        NmapScannerBuilder::default()
    }

    fn discover(&self) -> Result<()> {
        let report = self.tool.run(&self.subnet)?;
        let hosts = parse_report(&report)?;

        log::info!("nmap reported {} hosts", hosts.len());

        for host in hosts {
            if !host.is_up() {
                log::debug!("skipping host in state {:?}", host.state);
                continue;
            }

            match host.into_record() {
                Some(record) => self
                    .notifier
                    .send(ScanMessage::Live(record))
                    .map_err(SweepError::from_channel_send_error)?,
                None => log::warn!("skipping up host without an IPv4 address"),
            }
        }

        Ok(())
    }
}

// Implements the Scanner trait for NmapScanner
impl Scanner for NmapScanner {
    fn scan(&self) -> Result<JoinHandle<Result<()>>> {
        log::debug!("performing nmap sweep on subnet: {}", self.subnet);

        let self_clone = self.clone();

        Ok(thread::spawn(move || -> Result<()> {
            let discovered = self_clone.discover();

            // Done is always sent so the consumer never waits on a failed run;
            // the error surfaces through the join handle instead
            self_clone
                .notifier
                .send(ScanMessage::Done)
                .map_err(SweepError::from_channel_send_error)?;

            discovered
        }))
    }
}

#[cfg(test)]
#[path = "./nmap_scanner_tests.rs"]
mod tests;

//! Provides Scanner implementation for ICMP sweeping

use derive_builder::Builder;
use std::{
    net::Ipv4Addr,
    sync::{Arc, mpsc},
    thread::{self, JoinHandle},
};
use threadpool::ThreadPool;

use crate::{
    error::{Result, SweepError},
    probe::{HostProbe, ProbeOutcome},
    targets::subnet::Subnet,
};

use super::{DEFAULT_CONCURRENCY, Probing, ScanMessage, Scanner};

/// Data structure representing an ICMP scanner
#[derive(Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct IcmpScanner {
    /// Subnet whose every address is probed
    subnet: Arc<Subnet>,
    /// Probe used to decide liveness of each address
    probe: Arc<dyn HostProbe>,
    /// Maximum number of probes in flight at once
    #[builder(default = "DEFAULT_CONCURRENCY")]
    concurrency: usize,
    /// Channel for sending sweep results and status messages
    notifier: mpsc::Sender<ScanMessage>,
}

impl IcmpScannerBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.concurrency == Some(0) {
            return Err("concurrency must be at least 1".to_string());
        }
        Ok(())
    }
}

impl IcmpScanner {
    /// Returns builder for IcmpScanner
    pub fn builder() -> IcmpScannerBuilder {
        IcmpScannerBuilder::default()
    }

    fn dispatch(&self, target: Ipv4Addr, pool: &ThreadPool) {
        let probe = Arc::clone(&self.probe);
        let notifier = self.notifier.clone();

        pool.execute(move || {
            // consumer may have hung up, nothing left to report to
            let _ = notifier.send(ScanMessage::Info(Probing { ip: target }));

            match probe.probe(target) {
                ProbeOutcome::Live(record) => {
                    log::debug!("{} is live", target);
                    let _ = notifier.send(ScanMessage::Live(record));
                }
                ProbeOutcome::Down => {
                    log::debug!("{} did not respond", target);
                }
                ProbeOutcome::Error(reason) => {
                    log::debug!("failed to probe {}: {}", target, reason);
                }
            }
        });
    }
}

// Implements the Scanner trait for IcmpScanner
impl Scanner for IcmpScanner {
    fn scan(&self) -> Result<JoinHandle<Result<()>>> {
        log::debug!("performing ICMP sweep on subnet: {}", self.subnet);
        log::debug!("concurrency: {}", self.concurrency);

        let self_clone = self.clone();

        // prevent blocking thread so messages can be freely sent to consumer
        Ok(thread::spawn(move || -> Result<()> {
            let pool = ThreadPool::new(self_clone.concurrency);

            self_clone.subnet.lazy_loop(|target| {
                self_clone.dispatch(target, &pool);
                Ok(())
            })?;

            // every dispatched probe has finished past this point
            pool.join();

            if pool.panic_count() > 0 {
                log::warn!(
                    "{} probes panicked and were treated as down",
                    pool.panic_count()
                );
            }

            self_clone
                .notifier
                .send(ScanMessage::Done)
                .map_err(SweepError::from_channel_send_error)?;

            Ok(())
        }))
    }
}

#[cfg(test)]
#[path = "./icmp_scanner_tests.rs"]
mod tests;

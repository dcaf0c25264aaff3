//! Library package for discovering live hosts on an IPv4 subnet
//!
//! Every address of a CIDR block is probed, either with one `ping` per
//! address on a bounded worker pool or with a single `nmap` discovery run,
//! and the live hosts are written to a timestamped CSV report.
//!
//! # Examples
//!
//! ## ICMP Sweeping
//!
//! ```bash
//! cargo run --example icmp-sweep -p hostsweep-lib
//! ```
//!
//! ## nmap Sweeping (hostnames + OS guesses)
//!
//! ```bash
//! sudo -E cargo run --example nmap-sweep -p hostsweep-lib
//! ```

#![deny(missing_docs)]
pub mod error;
pub mod probe;
pub mod report;
pub mod scanners;
pub mod targets;

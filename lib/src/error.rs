//! Custom Error and Result types for this library

use std::{
    any::Any,
    sync::mpsc::{RecvError, SendError},
};
use thiserror::Error;

use crate::{
    probe::ping::PingBuilderError,
    scanners::{
        ScanMessage, icmp_scanner::IcmpScannerBuilderError,
        nmap_scanner::NmapScannerBuilderError,
    },
};

/// Custom Error type for this library
#[derive(Error, Debug)]
pub enum SweepError {
    /// The provided subnet is not valid IPv4 CIDR notation
    #[error("invalid subnet {subnet}: {error}")]
    InvalidSubnet {
        /// The subnet text that failed to parse
        subnet: String,
        /// The underlying parse error
        error: String,
    },

    /// An external tool could not be launched or exited unsuccessfully
    #[error("failed to run {tool}: {error}")]
    ToolLaunch {
        /// Name of the executable
        tool: String,
        /// Reason the invocation failed
        error: String,
    },

    /// The structured report produced by an external tool was malformed
    #[error("failed to parse tool output: {_0}")]
    ToolOutputParse(String),

    /// Errors creating or writing the report file
    #[error("io error: {_0}")]
    Io(#[from] std::io::Error),

    /// Errors serializing report rows
    #[error("csv error: {_0}")]
    Csv(#[from] csv::Error),

    /// Errors resulting from the results channel
    #[error("failed to send notification message: {:#?}", _0)]
    NotifierSend(#[from] SendError<Box<ScanMessage>>),

    /// Errors when consuming messages from channels
    #[error("failed to receive message from channel: {:#?}", _0)]
    ChannelReceive(#[from] RecvError),

    /// Generic thread error
    #[error("thread error: {_0}")]
    ThreadError(String),

    /// Error resulting from failure to build the ping probe
    #[error("failed to build ping probe: {_0}")]
    PingBuild(#[from] PingBuilderError),

    /// Error resulting from failure to build the ICMP scanner
    #[error("failed to build icmp scanner: {_0}")]
    IcmpScannerBuild(#[from] IcmpScannerBuilderError),

    /// Error resulting from failure to build the nmap scanner
    #[error("failed to build nmap scanner: {_0}")]
    NmapScannerBuild(#[from] NmapScannerBuilderError),
}

impl From<Box<dyn Any + Send>> for SweepError {
    fn from(value: Box<dyn Any + Send>) -> Self {
        if let Some(s) = value.downcast_ref::<&'static str>() {
            Self::ThreadError(format!("Thread panicked with: {}", s))
        } else if let Some(s) = value.downcast_ref::<String>() {
            Self::ThreadError(format!("Thread panicked with: {}", s))
        } else {
            Self::ThreadError("Thread panicked with an unknown type".into())
        }
    }
}

impl From<quick_xml::Error> for SweepError {
    fn from(value: quick_xml::Error) -> Self {
        Self::ToolOutputParse(value.to_string())
    }
}

impl SweepError {
    /// Converter for ipnet::AddrParseError
    pub fn from_ipnet_addr_parse_error(
        subnet: &str,
        error: ipnet::AddrParseError,
    ) -> Self {
        Self::InvalidSubnet {
            subnet: subnet.to_string(),
            error: error.to_string(),
        }
    }

    /// Converter for errors spawning or waiting on external tools
    pub fn from_tool_error(tool: &str, error: impl ToString) -> Self {
        Self::ToolLaunch {
            tool: tool.to_string(),
            error: error.to_string(),
        }
    }

    /// Converter for channel send errors
    pub fn from_channel_send_error(e: SendError<ScanMessage>) -> Self {
        SweepError::NotifierSend(SendError(Box::from(e.0)))
    }
}

/// Custom Result type for this library. All Errors exposed by this library
/// will be returned as [`SweepError`]
pub type Result<T> = std::result::Result<T, SweepError>;

//! CLI for sweeping an IPv4 subnet for live hosts
//!
//! Probes every address of the subnet with `ping` (or runs a single `nmap`
//! discovery with OS detection) and writes the live hosts to a CSV report.
//!
//! # Examples
//!
//! ```bash
//! # help menu
//! hostsweep --help
//!
//! # ping sweep of a /24 using 128 concurrent probes
//! hostsweep --subnet 10.0.0.0/24 --concurrency 128
//!
//! # nmap sweep with hostnames and OS guesses
//! sudo hostsweep --strategy rich --output lan.csv
//! ```
use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, eyre};
use hostsweep_lib::{
    error::Result as LibResult,
    probe::{DiscoveryTool, HostProbe, nmap::Nmap, ping::Ping},
    report,
    scanners::{
        self, DEFAULT_CONCURRENCY, HostRecord, ScanMessage, Scanner,
        icmp_scanner::IcmpScanner, nmap_scanner::NmapScanner,
    },
    targets::subnet::Subnet,
};
use log::*;
use std::{
    fmt,
    path::PathBuf,
    sync::{
        Arc,
        mpsc::{self, Receiver, Sender},
    },
    time::Duration,
};

#[doc(hidden)]
const DEFAULT_SUBNET: &str = "192.168.35.0/24";

#[doc(hidden)]
const DEFAULT_OUTPUT: &str = "scan_result.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
/// How hosts are discovered
enum Strategy {
    /// One ping per address on a bounded worker pool
    Icmp,
    /// A single nmap run with hostname and OS detection (requires root)
    Rich,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Icmp => write!(f, "icmp"),
            Strategy::Rich => write!(f, "rich"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// CLI for sweeping an IPv4 subnet for live hosts
struct Args {
    /// Subnet to sweep in CIDR notation
    #[arg(short, long, default_value = DEFAULT_SUBNET)]
    subnet: String,

    /// Destination CSV file, recreated on every run
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Discovery strategy
    #[arg(long, value_enum, default_value_t = Strategy::Icmp)]
    strategy: Strategy,

    /// Per-probe timeout in milliseconds
    #[arg(long, default_value_t = 1000)]
    timeout_ms: u64,

    /// Maximum number of concurrent probes (icmp strategy)
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Perform reverse dns lookups for live hosts (icmp strategy)
    #[arg(long, default_value_t = false)]
    host_names: bool,

    /// Ping executable used by the icmp strategy
    #[arg(long, default_value = "ping")]
    ping_bin: String,

    /// Nmap executable used by the rich strategy
    #[arg(long, default_value = "nmap")]
    nmap_bin: String,

    /// Output final results in json instead of table text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Only print final output nothing else
    #[arg(short, long, default_value_t = false)]
    quiet: bool,

    /// Prints debug logs including those from hostsweep-lib
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[doc(hidden)]
fn initialize_logger(args: &Args) -> Result<()> {
    let filter = if args.quiet {
        simplelog::LevelFilter::Error
    } else if args.debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    simplelog::TermLogger::init(
        filter,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[doc(hidden)]
fn print_args(args: &Args) {
    info!("configuration:");
    info!("subnet:       {}", args.subnet);
    info!("output:       {}", args.output.display());
    info!("strategy:     {}", args.strategy);
    info!("timeout_ms:   {}", args.timeout_ms);
    info!("concurrency:  {}", args.concurrency);
    info!("host_names:   {}", args.host_names);
    info!("json:         {}", args.json);
    info!("quiet:        {}", args.quiet);
}

#[doc(hidden)]
fn build_scanner(
    args: &Args,
    subnet: Arc<Subnet>,
    notifier: Sender<ScanMessage>,
) -> Result<Box<dyn Scanner>> {
    match args.strategy {
        Strategy::Icmp => {
            let probe: Arc<dyn HostProbe> = Arc::new(
                Ping::builder()
                    .program(args.ping_bin.clone())
                    .timeout(Duration::from_millis(args.timeout_ms))
                    .include_host_names(args.host_names)
                    .build()?,
            );

            let scanner = IcmpScanner::builder()
                .subnet(subnet)
                .probe(probe)
                .concurrency(args.concurrency)
                .notifier(notifier)
                .build()?;

            Ok(Box::new(scanner))
        }
        Strategy::Rich => {
            let tool: Arc<dyn DiscoveryTool> =
                Arc::new(Nmap::new(args.nmap_bin.clone()));

            let scanner = NmapScanner::builder()
                .subnet(subnet)
                .tool(tool)
                .notifier(notifier)
                .build()?;

            Ok(Box::new(scanner))
        }
    }
}

#[doc(hidden)]
fn process_sweep(
    scanner: &dyn Scanner,
    rx: &Receiver<ScanMessage>,
) -> LibResult<Vec<HostRecord>> {
    info!("starting sweep...");

    let results = scanners::collect(scanner, rx)?;

    info!("found {} live hosts", results.len());

    Ok(results)
}

#[doc(hidden)]
fn print_results(args: &Args, hosts: &[HostRecord]) -> Result<()> {
    if args.json {
        let j: String = serde_json::to_string(hosts)?;
        println!("{}", j);
    } else {
        let mut table = prettytable::Table::new();

        table.add_row(prettytable::row!["#", "IP", "HOSTNAME", "OS"]);

        for (idx, h) in hosts.iter().enumerate() {
            table.add_row(prettytable::row![
                idx + 1,
                h.ip,
                h.hostname.as_deref().unwrap_or_default(),
                h.os.as_deref().unwrap_or_default()
            ]);
        }

        table.printstd();
    }

    Ok(())
}

#[doc(hidden)]
#[cfg(unix)]
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[doc(hidden)]
#[cfg(windows)]
fn is_root() -> bool {
    // On Windows, check if running as Administrator
    use std::process::Command;
    Command::new("net")
        .args(["session"])
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[doc(hidden)]
fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(&args)?;

    if args.strategy == Strategy::Rich && !is_root() {
        return Err(eyre!(
            "permission denied: rich strategy must run with root privileges"
        ));
    }

    let subnet = Subnet::new(&args.subnet)
        .map_err(|e| eyre!("Invalid subnet: {}", e))?;

    print_args(&args);

    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let scanner = build_scanner(&args, subnet, tx)?;

    let results = process_sweep(scanner.as_ref(), &rx)?;

    print_results(&args, &results)?;

    report::save_csv(&args.output, &results)?;

    info!("results written to {}", args.output.display());

    Ok(())
}

#[cfg(test)]
#[path = "./main_tests.rs"]
mod tests;

use std::{
    env,
    sync::{Arc, mpsc},
};

use hostsweep_lib::{
    probe::{DiscoveryTool, nmap::Nmap},
    report,
    scanners::{self, ScanMessage, nmap_scanner::NmapScanner},
    targets::subnet::Subnet,
};

fn is_root() -> bool {
    match env::var("USER") {
        Ok(val) => val == "root",
        Err(_e) => false,
    }
}

fn main() {
    if !is_root() {
        panic!("permission denied: must run with root privileges");
    }
    let cidr = env::args()
        .nth(1)
        .unwrap_or_else(|| "192.168.35.0/24".to_string());
    let subnet = Subnet::new(&cidr).expect("failed to parse subnet");
    let tool: Arc<dyn DiscoveryTool> = Arc::new(Nmap::default());
    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let scanner = NmapScanner::builder()
        .subnet(subnet)
        .tool(tool)
        .notifier(tx)
        .build()
        .unwrap();

    let results = scanners::collect(&scanner, &rx).expect("sweep failed");

    println!("results: {:?}", results);

    report::save_csv("scan_result.csv", &results)
        .expect("failed to write report");
}

use std::{
    env,
    sync::{Arc, mpsc},
    time::Duration,
};

use hostsweep_lib::{
    probe::{HostProbe, ping::Ping},
    report,
    scanners::{self, ScanMessage, icmp_scanner::IcmpScanner},
    targets::subnet::Subnet,
};

fn main() {
    let cidr = env::args()
        .nth(1)
        .unwrap_or_else(|| "192.168.35.0/24".to_string());
    let subnet = Subnet::new(&cidr).expect("failed to parse subnet");
    let probe: Arc<dyn HostProbe> = Arc::new(
        Ping::builder()
            .timeout(Duration::from_millis(1000))
            .include_host_names(true)
            .build()
            .expect("failed to build ping probe"),
    );
    let (tx, rx) = mpsc::channel::<ScanMessage>();

    let scanner = IcmpScanner::builder()
        .subnet(subnet)
        .probe(probe)
        .concurrency(64_usize)
        .notifier(tx)
        .build()
        .unwrap();

    let results = scanners::collect(&scanner, &rx).expect("sweep failed");

    for host in results.iter() {
        println!("online: {}", host.ip);
    }

    report::save_csv("scan_result.csv", &results)
        .expect("failed to write report");

    println!("results written to scan_result.csv");
}

use super::*;
use std::sync::mpsc::channel;
use std::thread;

use crate::error::SweepError;

fn record(last_octet: u8) -> HostRecord {
    HostRecord {
        ip: Ipv4Addr::new(192, 168, 35, last_octet),
        hostname: None,
        os: None,
    }
}

#[test]
fn collects_live_hosts_in_arrival_order() {
    let (tx, rx) = channel();
    let mut scanner = MockScanner::new();

    scanner.expect_scan().times(1).returning(move || {
        let tx = tx.clone();
        Ok(thread::spawn(move || {
            tx.send(ScanMessage::Info(Probing {
                ip: Ipv4Addr::new(192, 168, 35, 9),
            }))
            .unwrap();
            tx.send(ScanMessage::Live(record(9))).unwrap();
            tx.send(ScanMessage::Live(record(3))).unwrap();
            tx.send(ScanMessage::Done).unwrap();
            Ok(())
        }))
    });

    let results = collect(&scanner, &rx).unwrap();

    assert_eq!(results, vec![record(9), record(3)]);
}

#[test]
fn does_not_deduplicate() {
    let (tx, rx) = channel();
    let mut scanner = MockScanner::new();

    scanner.expect_scan().returning(move || {
        let tx = tx.clone();
        Ok(thread::spawn(move || {
            tx.send(ScanMessage::Live(record(1))).unwrap();
            tx.send(ScanMessage::Live(record(1))).unwrap();
            tx.send(ScanMessage::Done).unwrap();
            Ok(())
        }))
    });

    let results = collect(&scanner, &rx).unwrap();

    assert_eq!(results.len(), 2);
}

#[test]
fn empty_sweep_returns_no_hosts() {
    let (tx, rx) = channel();
    let mut scanner = MockScanner::new();

    scanner.expect_scan().returning(move || {
        let tx = tx.clone();
        Ok(thread::spawn(move || {
            tx.send(ScanMessage::Done).unwrap();
            Ok(())
        }))
    });

    let results = collect(&scanner, &rx).unwrap();

    assert!(results.is_empty());
}

#[test]
fn returns_error_when_scan_fails_to_start() {
    let (_tx, rx) = channel();
    let mut scanner = MockScanner::new();

    scanner.expect_scan().returning(|| {
        Err(SweepError::ToolOutputParse("bad report".to_string()))
    });

    let result = collect(&scanner, &rx);

    assert!(matches!(result, Err(SweepError::ToolOutputParse(_))));
}

#[test]
fn returns_scan_error_without_waiting_for_done() {
    // the sender stays alive for the whole test so a missing Done can only
    // be detected through the finished scan thread
    let (tx, rx) = channel();
    let mut scanner = MockScanner::new();

    let thread_tx = tx.clone();
    scanner.expect_scan().returning(move || {
        let tx = thread_tx.clone();
        Ok(thread::spawn(move || {
            tx.send(ScanMessage::Live(record(4))).unwrap();
            Err(SweepError::ToolLaunch {
                tool: "nmap".to_string(),
                error: "not found".to_string(),
            })
        }))
    });

    let result = collect(&scanner, &rx);

    assert!(matches!(result, Err(SweepError::ToolLaunch { .. })));
    drop(tx);
}

#[test]
fn converts_scan_thread_panic_to_error() {
    let (tx, rx) = channel::<ScanMessage>();
    let mut scanner = MockScanner::new();

    scanner.expect_scan().returning(|| {
        Ok(thread::spawn(|| -> Result<()> { panic!("probe exploded") }))
    });

    let result = collect(&scanner, &rx);

    assert!(matches!(result, Err(SweepError::ThreadError(_))));
    drop(tx);
}

#[test]
fn reports_disconnect_before_done() {
    let (tx, rx) = channel();
    let mut scanner = MockScanner::new();

    scanner.expect_scan().return_once(move || {
        Ok(thread::spawn(move || {
            tx.send(ScanMessage::Live(record(5))).unwrap();
            Ok(())
        }))
    });

    let result = collect(&scanner, &rx);

    assert!(matches!(result, Err(SweepError::ChannelReceive(_))));
}

#[test]
fn reports_finished_thread_without_done() {
    // the sender outlives the scan thread so the channel never disconnects
    let (tx, rx) = channel();
    let mut scanner = MockScanner::new();

    let thread_tx = tx.clone();
    scanner.expect_scan().returning(move || {
        let tx = thread_tx.clone();
        Ok(thread::spawn(move || {
            tx.send(ScanMessage::Live(record(6))).unwrap();
            Ok(())
        }))
    });

    let result = collect(&scanner, &rx);

    assert!(matches!(result, Err(SweepError::ChannelReceive(_))));
    drop(tx);
}

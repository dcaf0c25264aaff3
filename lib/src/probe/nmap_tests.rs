use super::*;

const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<?xml-stylesheet href="file:///usr/bin/../share/nmap/nmap.xsl" type="text/xsl"?>
<nmaprun scanner="nmap" args="nmap -O -sP --osscan-guess -oX - 192.168.35.0/24" version="7.94">
  <hosthint>
    <status state="up" reason="arp-response" reason_ttl="0"/>
    <address addr="192.168.35.1" addrtype="ipv4"/>
  </hosthint>
  <host>
    <status state="up" reason="arp-response" reason_ttl="0"/>
    <address addr="192.168.35.1" addrtype="ipv4"/>
    <address addr="AA:BB:CC:DD:EE:FF" addrtype="mac" vendor="Acme"/>
    <hostnames>
      <hostname name="router.lan" type="PTR"/>
      <hostname name="gateway.lan" type="user"/>
    </hostnames>
    <os>
      <osmatch name="Linux 5.0 - 5.14" accuracy="98" line="67010">
        <osclass type="general purpose" vendor="Linux" osfamily="Linux" accuracy="98"/>
      </osmatch>
      <osmatch name="Linux 4.15" accuracy="91" line="66000"/>
    </os>
  </host>
  <host>
    <status state="down" reason="no-response"/>
    <address addr="192.168.35.2" addrtype="ipv4"/>
    <hostnames><hostname name="ghost.lan" type="PTR"/></hostnames>
    <os><osmatch name="Windows 10" accuracy="90"/></os>
  </host>
  <host>
    <status state="up" reason="echo-reply"/>
    <address addr="192.168.35.20" addrtype="ipv4"/>
    <hostnames/>
  </host>
  <runstats>
    <finished time="1700000000" elapsed="3.21"/>
    <hosts up="2" down="254" total="256"/>
  </runstats>
</nmaprun>
"#;

#[test]
fn parses_hosts_in_document_order() {
    let hosts = parse_report(REPORT).unwrap();

    assert_eq!(hosts.len(), 3);
    assert_eq!(hosts[0].state, "up");
    assert_eq!(hosts[1].state, "down");
    assert_eq!(hosts[2].state, "up");
}

#[test]
fn parses_addresses_hostnames_and_os_matches() {
    let hosts = parse_report(REPORT).unwrap();
    let router = &hosts[0];

    assert_eq!(
        router.addresses,
        vec![
            NmapAddress {
                addr: "192.168.35.1".to_string(),
                addr_type: "ipv4".to_string(),
            },
            NmapAddress {
                addr: "AA:BB:CC:DD:EE:FF".to_string(),
                addr_type: "mac".to_string(),
            },
        ]
    );
    assert_eq!(router.hostnames, vec!["router.lan", "gateway.lan"]);
    assert_eq!(router.os_matches, vec!["Linux 5.0 - 5.14", "Linux 4.15"]);
}

#[test]
fn converts_up_host_using_first_entries() {
    let hosts = parse_report(REPORT).unwrap();
    let record = hosts[0].clone().into_record().unwrap();

    assert_eq!(record.ip, Ipv4Addr::new(192, 168, 35, 1));
    assert_eq!(record.hostname.as_deref(), Some("router.lan"));
    assert_eq!(record.os.as_deref(), Some("Linux 5.0 - 5.14"));
}

#[test]
fn up_host_without_metadata_has_empty_fields() {
    let hosts = parse_report(REPORT).unwrap();
    let record = hosts[2].clone().into_record().unwrap();

    assert_eq!(record.ip, Ipv4Addr::new(192, 168, 35, 20));
    assert!(record.hostname.is_none());
    assert!(record.os.is_none());
}

#[test]
fn host_not_up_never_produces_a_record() {
    let hosts = parse_report(REPORT).unwrap();
    assert!(hosts[1].clone().into_record().is_none());

    for state in ["down", "unknown", "skipped", "", "UP"] {
        let host = NmapHost {
            state: state.to_string(),
            addresses: vec![NmapAddress {
                addr: "10.0.0.1".to_string(),
                addr_type: "ipv4".to_string(),
            }],
            hostnames: vec!["host.lan".to_string()],
            os_matches: vec!["Linux".to_string()],
        };
        assert!(host.into_record().is_none(), "state {state:?}");
    }
}

#[test]
fn up_host_without_ipv4_is_skipped() {
    let host = NmapHost {
        state: "up".to_string(),
        addresses: vec![
            NmapAddress {
                addr: "fe80::1".to_string(),
                addr_type: "ipv6".to_string(),
            },
            NmapAddress {
                addr: "AA:BB:CC:DD:EE:FF".to_string(),
                addr_type: "mac".to_string(),
            },
        ],
        ..Default::default()
    };

    assert!(host.ipv4().is_none());
    assert!(host.into_record().is_none());
}

#[test]
fn parses_report_without_hosts() {
    let hosts = parse_report("<nmaprun><runstats/></nmaprun>").unwrap();
    assert!(hosts.is_empty());
}

#[test]
fn unescapes_attribute_values() {
    let xml = r#"<nmaprun><host><status state="up"/>
        <address addr="10.1.1.1" addrtype="ipv4"/>
        <hostnames><hostname name="a&amp;b.lan"/></hostnames>
        </host></nmaprun>"#;

    let hosts = parse_report(xml).unwrap();
    assert_eq!(hosts[0].hostnames, vec!["a&b.lan"]);
}

#[test]
fn returns_error_for_missing_root() {
    let result = parse_report("");
    assert!(matches!(result, Err(SweepError::ToolOutputParse(_))));

    let result = parse_report("Starting Nmap 7.94 ( https://nmap.org )");
    assert!(matches!(result, Err(SweepError::ToolOutputParse(_))));
}

#[test]
fn returns_error_for_mismatched_tags() {
    let result = parse_report("<nmaprun><host></hostnames></nmaprun>");
    assert!(matches!(result, Err(SweepError::ToolOutputParse(_))));
}

#[test]
fn returns_error_for_truncated_report() {
    let truncated = &REPORT[..REPORT.find("<runstats>").unwrap()];
    let result = parse_report(truncated);
    assert!(matches!(result, Err(SweepError::ToolOutputParse(_))));
}

#[test]
fn missing_binary_is_a_launch_error() {
    let nmap = Nmap::new("hostsweep-no-such-nmap-binary");
    let subnet = Subnet::new("192.168.35.0/24").unwrap();

    let result = nmap.run(&subnet);

    assert!(matches!(result, Err(SweepError::ToolLaunch { .. })));
}

#[cfg(unix)]
#[test]
fn failed_exit_is_a_launch_error() {
    let nmap = Nmap::new("false");
    let subnet = Subnet::new("192.168.35.0/24").unwrap();

    let result = nmap.run(&subnet);

    assert!(matches!(result, Err(SweepError::ToolLaunch { .. })));
}

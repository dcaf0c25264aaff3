use mockall::mock;
use std::net::Ipv4Addr;

use crate::{error::Result, targets::subnet::Subnet};

use super::{DiscoveryTool, HostProbe, ProbeOutcome};

mock! {
    pub Probe {}
    impl HostProbe for Probe {
        fn probe(&self, ip: Ipv4Addr) -> ProbeOutcome;
    }
}

mock! {
    pub Tool {}
    impl DiscoveryTool for Tool {
        fn run(&self, subnet: &Subnet) -> Result<String>;
    }
}

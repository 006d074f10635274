//! Network interface used for station join and access point mode.

use crate::credentials::StaticNetwork;
use crate::error::Result;
use std::net::Ipv4Addr;
use tracing::{info, warn};

/// Address of the access point when the platform does not report one.
pub const DEFAULT_AP_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

/// Link state reported by the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connected,
    NotConnected,
}

/// Station-mode join and access-point control.
///
/// `join` only starts the association; progress is observed through
/// [`NetworkInterface::status`].
pub trait NetworkInterface {
    /// Starts joining `ssid`, applying `network` first when given.
    fn join(&mut self, ssid: &str, password: &str, network: Option<&StaticNetwork>) -> Result<()>;

    fn status(&self) -> LinkStatus;

    fn local_address(&self) -> Option<Ipv4Addr>;

    /// Brings up an open access point named `name` and returns its address.
    fn start_access_point(&mut self, name: &str) -> Result<Ipv4Addr>;
}

/// Network interface of a host machine.
///
/// The host is already managed by its operating system: it counts as
/// connected as soon as a non-loopback IPv4 address is configured, and the
/// access point is only announced.
#[derive(Debug, Default)]
pub struct HostNetwork {
    joined: Option<String>,
}

impl HostNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// SSID passed to the last `join`.
    pub fn joined(&self) -> Option<&str> {
        self.joined.as_deref()
    }
}

impl NetworkInterface for HostNetwork {
    fn join(&mut self, ssid: &str, _password: &str, network: Option<&StaticNetwork>) -> Result<()> {
        if let Some(network) = network {
            info!(
                address=%network.address,
                gateway=%network.gateway,
                subnet=%network.subnet,
                "Static address requested, left to the host configuration"
            );
        }
        info!(ssid=%ssid, "Connecting to WiFi...");
        self.joined = Some(ssid.to_string());
        Ok(())
    }

    fn status(&self) -> LinkStatus {
        if self.joined.is_some() && pmoutils::first_ipv4().is_some() {
            LinkStatus::Connected
        } else {
            LinkStatus::NotConnected
        }
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        pmoutils::first_ipv4()
    }

    fn start_access_point(&mut self, name: &str) -> Result<Ipv4Addr> {
        let address = pmoutils::first_ipv4().unwrap_or_else(|| {
            warn!("No local IPv4 address, announcing the default access point address");
            DEFAULT_AP_ADDRESS
        });
        info!(ap=%name, %address, "Setting AP (Access Point)");
        Ok(address)
    }
}

//! Connectivity state machine.
//!
//! `Idle → Connecting → {Connected, ProvisioningActive}`. Both outcomes are
//! final for the session: leaving them requires a restart. Exactly one join
//! is attempted per boot, bounded by a deadline checked on every poll.

use crate::credentials::{Credentials, StaticNetwork};
use crate::error::Result;
use crate::network::{LinkStatus, NetworkInterface};
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Default join timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default interval between two link status checks during the join.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Well-known name of the provisioning access point.
pub const DEFAULT_AP_NAME: &str = "WEBRADIO-SETUP";
/// Delay between the provisioning reply and the restart.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(3);

/// Timing and naming of the network bring-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiSettings {
    pub connect_timeout: Duration,
    pub poll_interval: Duration,
    pub ap_name: String,
    pub restart_delay: Duration,
}

impl Default for WifiSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            ap_name: DEFAULT_AP_NAME.to_string(),
            restart_delay: DEFAULT_RESTART_DELAY,
        }
    }
}

/// Why the device ended up in provisioning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningReason {
    /// No SSID stored
    NotConfigured,
    /// The stored static IP is malformed
    InvalidStaticIp,
    /// The interface rejected the join
    JoinFailed,
    /// The link did not come up before the deadline
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityState {
    Idle,
    Connecting { deadline: Instant },
    Connected { address: Ipv4Addr },
    ProvisioningActive { reason: ProvisioningReason },
}

impl ConnectivityState {
    /// `Connected` and `ProvisioningActive` are final for the session.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConnectivityState::Connected { .. } | ConnectivityState::ProvisioningActive { .. }
        )
    }
}

pub struct ConnectivityManager {
    credentials: Credentials,
    settings: WifiSettings,
    network: Option<StaticNetwork>,
    state: ConnectivityState,
}

impl ConnectivityManager {
    pub fn new(credentials: Credentials, settings: WifiSettings) -> Self {
        Self {
            credentials,
            settings,
            network: None,
            state: ConnectivityState::Idle,
        }
    }

    pub fn state(&self) -> &ConnectivityState {
        &self.state
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn settings(&self) -> &WifiSettings {
        &self.settings
    }

    /// Leaves `Idle`: issues the single join of this boot.
    ///
    /// A blank SSID or a malformed static IP goes straight to provisioning
    /// without touching the interface. Calling `start` again is a no-op.
    pub fn start<N>(&mut self, net: &mut N, now: Instant) -> &ConnectivityState
    where
        N: NetworkInterface + ?Sized,
    {
        if self.state != ConnectivityState::Idle {
            warn!(state=?self.state, "Network bring-up already started");
            return &self.state;
        }

        if !self.credentials.is_configured() {
            info!("Undefined SSID.");
            return self.enter_provisioning(ProvisioningReason::NotConfigured);
        }

        self.network = match self.credentials.network() {
            Ok(network) => network,
            Err(e) => {
                error!(error=%e, "STA Failed to configure");
                return self.enter_provisioning(ProvisioningReason::InvalidStaticIp);
            }
        };

        if let Err(e) = net.join(
            &self.credentials.ssid,
            &self.credentials.password,
            self.network.as_ref(),
        ) {
            error!(error=%e, "Join request rejected");
            return self.enter_provisioning(ProvisioningReason::JoinFailed);
        }

        let deadline = now + self.settings.connect_timeout;
        debug!(timeout=?self.settings.connect_timeout, "Waiting for the link");
        self.state = ConnectivityState::Connecting { deadline };
        &self.state
    }

    /// Checks the link once while `Connecting`; a no-op in other states.
    pub fn poll<N>(&mut self, net: &N, now: Instant) -> &ConnectivityState
    where
        N: NetworkInterface + ?Sized,
    {
        let ConnectivityState::Connecting { deadline } = self.state else {
            return &self.state;
        };

        if net.status() == LinkStatus::Connected {
            let address = net
                .local_address()
                .or(self.network.map(|n| n.address))
                .unwrap_or(Ipv4Addr::UNSPECIFIED);
            info!(%address, ssid=%self.credentials.ssid, "Connected");
            self.state = ConnectivityState::Connected { address };
        } else if now >= deadline {
            warn!(ssid=%self.credentials.ssid, "Failed to connect.");
            self.state = ConnectivityState::ProvisioningActive {
                reason: ProvisioningReason::Timeout,
            };
        }
        &self.state
    }

    /// Startup-only bounded wait: starts the join if needed and polls every
    /// `poll_interval` until a final state is reached.
    pub async fn connect<N>(&mut self, net: &mut N) -> &ConnectivityState
    where
        N: NetworkInterface + ?Sized,
    {
        if self.state == ConnectivityState::Idle {
            self.start(net, tokio::time::Instant::now().into_std());
        }

        while !self.state.is_terminal() {
            self.poll(net, tokio::time::Instant::now().into_std());
            if !self.state.is_terminal() {
                tokio::time::sleep(self.settings.poll_interval).await;
            }
        }
        &self.state
    }

    /// Brings up the provisioning access point under the configured name.
    pub fn activate_provisioning<N>(&self, net: &mut N) -> Result<Ipv4Addr>
    where
        N: NetworkInterface + ?Sized,
    {
        let address = net.start_access_point(&self.settings.ap_name)?;
        info!(ap=%self.settings.ap_name, %address, "AP IP address");
        Ok(address)
    }

    fn enter_provisioning(&mut self, reason: ProvisioningReason) -> &ConnectivityState {
        self.state = ConnectivityState::ProvisioningActive { reason };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!ConnectivityState::Idle.is_terminal());
        assert!(
            !ConnectivityState::Connecting {
                deadline: Instant::now()
            }
            .is_terminal()
        );
        assert!(
            ConnectivityState::Connected {
                address: Ipv4Addr::LOCALHOST
            }
            .is_terminal()
        );
        assert!(
            ConnectivityState::ProvisioningActive {
                reason: ProvisioningReason::Timeout
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = WifiSettings::default();
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.ap_name, "WEBRADIO-SETUP");
        assert_eq!(settings.restart_delay, Duration::from_secs(3));
    }
}

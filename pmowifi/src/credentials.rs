//! Network credentials and the static address configuration derived from them.

use crate::error::{Result, WifiError};
use pmoconfig::{ConfigStore, SettingKey};
use pmoutils::{SUBNET_24, default_gateway, parse_ipv4};
use serde::Deserialize;
use std::net::Ipv4Addr;
use tracing::{info, warn};

/// SSID / password / optional static IP, as persisted in the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub ssid: String,
    pub password: String,
    pub static_ip: Option<String>,
}

impl Credentials {
    /// Reads the three records of `store`. Missing records read as empty.
    pub fn load(store: &dyn ConfigStore) -> Self {
        let static_ip = store.read(SettingKey::StaticIp);
        let credentials = Self {
            ssid: store.read(SettingKey::Ssid),
            password: store.read(SettingKey::Password),
            static_ip: (!static_ip.trim().is_empty()).then_some(static_ip),
        };
        info!(
            ssid=%credentials.ssid,
            static_ip=?credentials.static_ip,
            "Loaded network credentials"
        );
        credentials
    }

    /// A blank SSID means the device was never configured.
    pub fn is_configured(&self) -> bool {
        !self.ssid.trim().is_empty()
    }

    /// Static configuration to apply before joining, `None` for DHCP.
    ///
    /// A static IP that is set but unusable is an error: the join must not
    /// silently fall back to DHCP.
    pub fn network(&self) -> Result<Option<StaticNetwork>> {
        self.static_ip
            .as_deref()
            .map(StaticNetwork::from_address)
            .transpose()
    }
}

/// Static IPv4 configuration: address, gateway and subnet mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticNetwork {
    pub address: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub subnet: Ipv4Addr,
}

impl StaticNetwork {
    /// Derives the gateway (`.1` of the /24) and subnet from `address`.
    pub fn from_address(address: &str) -> Result<Self> {
        let ip = parse_ipv4(address).map_err(|source| WifiError::InvalidStaticIp {
            value: address.to_string(),
            source,
        })?;
        Ok(Self {
            address: ip,
            gateway: default_gateway(ip),
            subnet: SUBNET_24,
        })
    }
}

/// Fields posted by the provisioning form. Each one is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisioningSubmission {
    pub ssid: Option<String>,
    pub pass: Option<String>,
    pub ip: Option<String>,
}

impl ProvisioningSubmission {
    /// Writes the submitted fields to `store`, one record at a time.
    ///
    /// Values are stored exactly as posted. A blank `ssid` or `pass` is
    /// skipped; a present but blank `ip` clears the static address (DHCP).
    /// Fields are independent: a failing write is logged and does not prevent
    /// the others. Returns the keys that were written successfully.
    pub fn apply(&self, store: &dyn ConfigStore) -> Vec<SettingKey> {
        let fields = [
            (SettingKey::Ssid, self.ssid.as_deref().filter(|v| !v.trim().is_empty())),
            (SettingKey::Password, self.pass.as_deref().filter(|v| !v.trim().is_empty())),
            (SettingKey::StaticIp, self.ip.as_deref().map(clear_if_blank)),
        ];

        let mut written = Vec::new();
        for (key, value) in fields {
            let Some(value) = value else {
                continue;
            };

            match store.write(key, value) {
                Ok(()) => {
                    // le mot de passe n'est jamais journalisé
                    if key == SettingKey::Password {
                        info!("Password set");
                    } else if value.is_empty() {
                        info!(%key, "Setting cleared");
                    } else {
                        info!(%key, value, "Setting saved");
                    }
                    written.push(key);
                }
                Err(e) => warn!(%key, error=%e, "Failed to save setting"),
            }
        }
        written
    }
}

fn clear_if_blank(value: &str) -> &str {
    if value.trim().is_empty() { "" } else { value }
}

//! # pmowifi - Mise en réseau de PMORadio
//!
//! Au démarrage, l'appareil tente **une seule** connexion au réseau
//! enregistré, bornée par un délai (10 s par défaut). S'il n'y a pas de SSID,
//! si l'adresse statique est invalide ou si le délai expire, il passe en mode
//! provisioning : un point d'accès ouvert `WEBRADIO-SETUP` sert un formulaire
//! (`ssid`, `pass`, `ip`) dont chaque champ est enregistré immédiatement,
//! puis l'appareil redémarre.
//!
//! ## Architecture
//!
//! - [`manager`] : machine à états `Idle → Connecting → {Connected, ProvisioningActive}`
//! - [`credentials`] : identifiants, configuration statique dérivée, soumission du formulaire
//! - [`network`] : trait [`NetworkInterface`] et implémentation hôte
//! - [`provisioning`] : routes Axum du formulaire
//! - [`restart`] : trait [`Restarter`] et redémarrage différé
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use pmoconfig::MemoryConfigStore;
//! use pmowifi::{ConnectivityManager, ConnectivityState, Credentials, HostNetwork, WifiSettings};
//!
//! # async fn run() -> pmowifi::Result<()> {
//! let store = MemoryConfigStore::new();
//! let mut net = HostNetwork::new();
//! let mut manager = ConnectivityManager::new(Credentials::load(&store), WifiSettings::default());
//!
//! if let ConnectivityState::ProvisioningActive { .. } = manager.connect(&mut net).await {
//!     let ip = manager.activate_provisioning(&mut net)?;
//!     println!("Open http://{ip}/ to configure the radio");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config_ext;
pub mod credentials;
pub mod error;
pub mod manager;
pub mod network;
pub mod provisioning;
pub mod restart;

pub use config_ext::WifiConfigExt;
pub use credentials::{Credentials, ProvisioningSubmission, StaticNetwork};
pub use error::{Result, WifiError};
pub use manager::{ConnectivityManager, ConnectivityState, ProvisioningReason, WifiSettings};
pub use network::{HostNetwork, LinkStatus, NetworkInterface};
pub use provisioning::{ProvisioningState, provisioning_router};
pub use restart::{ProcessRestarter, Restarter, schedule_restart};

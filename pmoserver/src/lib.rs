//! # pmoserver - Serveur web embarqué de PMORadio
//!
//! Cette crate fournit une abstraction simple autour d'Axum pour les deux
//! surfaces HTTP de l'appareil :
//!
//! - le formulaire de provisioning servi en mode point d'accès
//! - le formulaire de commandes et les routes de logs en mode connecté
//!
//! ## Architecture
//!
//! - [`server`] : serveur principal et builder
//! - [`logs`] : initialisation de `tracing`, buffer circulaire des logs et routes associées
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use pmoserver::ServerBuilder;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut server = ServerBuilder::new("Radio", "192.168.4.1", 80).build();
//!     server.init_logging().await;
//!
//!     server.add_route("/info", || async {
//!         serde_json::json!({"status": "ok"})
//!     }).await;
//!
//!     server.start().await;
//!     server.wait().await;
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{BufferLayer, LogEntry, LogState, log_dump};
pub use server::{Server, ServerBuilder, ServerInfo};

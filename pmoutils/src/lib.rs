//! Utilitaires réseau partagés par les crates PMORadio.
//!
//! - [`guess_local_ip`] : devine l'adresse IP utilisée pour les connexions sortantes
//! - [`first_ipv4`] : première adresse IPv4 non-loopback des interfaces locales
//! - [`parse_ipv4`] / [`default_gateway`] / [`SUBNET_24`] : dérivation d'une
//!   configuration statique à partir d'une simple adresse saisie par l'utilisateur
//!
//! # Examples
//!
//! ```
//! use pmoutils::{default_gateway, parse_ipv4};
//!
//! let ip = parse_ipv4("192.168.1.200").unwrap();
//! assert_eq!(default_gateway(ip).to_string(), "192.168.1.1");
//! ```
mod ip_utils;

pub use ip_utils::{
    AddressError, SUBNET_24, default_gateway, first_ipv4, guess_local_ip, parse_ipv4,
};

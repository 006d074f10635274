//! Station catalog of PMORadio
//!
//! The catalog is the ordered list of `(name, url)` stations loaded from a
//! two-column CSV table (`STATION_NAME`, `STATION_URL`, with a header row).
//! Stations are addressed by a **1-based** index; navigation wraps around in
//! both directions and never indexes out of range, even on an empty catalog.
//!
//! # Example
//!
//! ```
//! use pmostations::StationCatalog;
//!
//! let mut catalog = StationCatalog::new();
//! let count = catalog.load(
//!     "STATION_NAME,STATION_URL\n\
//!      Jazz,http://jazz.example/stream\n\
//!      Rock,http://rock.example/stream\n",
//! );
//! assert_eq!(count, 2);
//! assert_eq!(catalog.next(2), Some(1));
//! assert_eq!(catalog.previous(1), Some(2));
//! assert_eq!(catalog.get(1).map(|s| s.name.as_str()), Some("Jazz"));
//! ```

mod catalog;
pub mod config_ext;
pub mod error;

pub use catalog::{InitialStream, Station, StationCatalog};
pub use config_ext::StationsConfigExt;
pub use error::{Error, Result};

use crate::error::{Error, Result};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::{debug, info, warn};

const NAME_COLUMN: &str = "STATION_NAME";
const URL_COLUMN: &str = "STATION_URL";

/// A station of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    /// 1-based position in the catalog
    pub index: usize,
    pub name: String,
    pub url: String,
}

/// Stream to play right after the network came up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialStream {
    /// First entry of a loaded catalog
    Station(Station),
    /// Hardcoded stream used when no catalog is loaded
    Fallback(String),
}

impl InitialStream {
    pub fn url(&self) -> &str {
        match self {
            InitialStream::Station(station) => &station.url,
            InitialStream::Fallback(url) => url,
        }
    }

    /// Catalog index, `None` for the fallback stream
    pub fn index(&self) -> Option<usize> {
        match self {
            InitialStream::Station(station) => Some(station.index),
            InitialStream::Fallback(_) => None,
        }
    }
}

/// Ordered, bounds-checked station list.
#[derive(Debug, Clone, Default)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from `(name, url)` pairs, in order.
    pub fn from_pairs<N, U>(pairs: impl IntoIterator<Item = (N, U)>) -> Self
    where
        N: Into<String>,
        U: Into<String>,
    {
        let stations = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (name, url))| Station {
                index: i + 1,
                name: name.into(),
                url: url.into(),
            })
            .collect();
        Self { stations }
    }

    /// Replaces the catalog with the rows of `raw_table`.
    ///
    /// The first non-blank line is the header; the name and URL columns are
    /// located by their header label (case-insensitive) and default to the
    /// first and second column when the labels are missing. Rows without a
    /// URL are skipped and take no index: indices stay contiguous over the
    /// kept rows. Returns the number of stations loaded; `0` means "not
    /// loaded".
    pub fn load(&mut self, raw_table: &str) -> usize {
        self.stations.clear();

        let mut lines = raw_table
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());

        let Some(header) = lines.next() else {
            warn!("Station table is empty");
            return 0;
        };

        let columns = split_fields(header);
        let find = |label: &str| columns.iter().position(|c| c.eq_ignore_ascii_case(label));
        let (name_col, url_col) = match (find(NAME_COLUMN), find(URL_COLUMN)) {
            (Some(name), Some(url)) => (name, url),
            _ => {
                warn!(header=%header, "Station table header lacks {} / {}, using column order", NAME_COLUMN, URL_COLUMN);
                (0, 1)
            }
        };

        for (row, line) in lines.enumerate() {
            let fields = split_fields(line);
            let url = fields.get(url_col).cloned().unwrap_or_default();
            if url.is_empty() {
                warn!(row = row + 1, "Skipping station without URL");
                continue;
            }
            let name = fields.get(name_col).cloned().unwrap_or_default();

            self.stations.push(Station {
                index: self.stations.len() + 1,
                name,
                url,
            });
        }

        info!("Stations loaded: {}", self.stations.len());
        for station in &self.stations {
            info!("{} {} {}", station.index, station.name, station.url);
        }

        self.stations.len()
    }

    /// Loads the table stored at `path`.
    ///
    /// On error the catalog is left empty.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        debug!(file=%path.display(), "Loading station table");

        match fs::read_to_string(path) {
            Ok(content) => Ok(self.load(&content)),
            Err(source) => {
                self.stations.clear();
                Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// `true` if `index` addresses a station.
    pub fn contains(&self, index: usize) -> bool {
        (1..=self.stations.len()).contains(&index)
    }

    /// Station at the 1-based `index`.
    pub fn get(&self, index: usize) -> Option<&Station> {
        index.checked_sub(1).and_then(|i| self.stations.get(i))
    }

    pub fn first(&self) -> Option<&Station> {
        self.stations.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Index after `current`, wrapping from the last station to the first.
    pub fn next(&self, current: usize) -> Option<usize> {
        let count = self.stations.len();
        if count == 0 {
            return None;
        }
        Some(if current < count { current + 1 } else { 1 })
    }

    /// Index before `current`, wrapping from the first station to the last.
    pub fn previous(&self, current: usize) -> Option<usize> {
        let count = self.stations.len();
        if count == 0 {
            return None;
        }
        Some(if current <= 1 || current > count {
            count
        } else {
            current - 1
        })
    }

    /// First catalog entry, or `fallback_url` when nothing is loaded.
    pub fn initial_stream(&self, fallback_url: &str) -> InitialStream {
        match self.first() {
            Some(station) => InitialStream::Station(station.clone()),
            None => {
                warn!(url=%fallback_url, "No stations loaded, using fallback stream");
                InitialStream::Fallback(fallback_url.to_string())
            }
        }
    }
}

/// Splits a CSV line on commas, keeping commas inside double quotes.
/// Fields are trimmed of whitespace and surrounding quotes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            ',' if !quoted => fields.push(clean_field(&std::mem::take(&mut current))),
            _ => current.push(c),
        }
    }
    fields.push(clean_field(&current));
    fields
}

fn clean_field(field: &str) -> String {
    field.trim().trim_matches('"').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(
            split_fields("\"Radio, Jazz\",\"http://x\""),
            vec!["Radio, Jazz", "http://x"]
        );
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_header_defines_column_order() {
        let mut catalog = StationCatalog::new();
        let count = catalog.load("station_url;x,STATION_NAME\nhttp://a,Alpha\n");
        // en-tête sans STATION_URL exact : ordre des colonnes par défaut
        assert_eq!(count, 1);
        assert_eq!(catalog.get(1).unwrap().name, "http://a");

        let count = catalog.load("Station_Url,Station_Name\nhttp://a,Alpha\n");
        assert_eq!(count, 1);
        let station = catalog.get(1).unwrap();
        assert_eq!(station.name, "Alpha");
        assert_eq!(station.url, "http://a");
    }

    #[test]
    fn test_get_rejects_zero_and_overflow() {
        let catalog = StationCatalog::from_pairs([("A", "http://a")]);
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(2).is_none());
        assert!(catalog.contains(1));
        assert!(!catalog.contains(0));
    }

    #[test]
    fn test_out_of_range_current_is_normalized() {
        let catalog = StationCatalog::from_pairs([("A", "a"), ("B", "b"), ("C", "c")]);
        assert_eq!(catalog.next(0), Some(1));
        assert_eq!(catalog.next(9), Some(1));
        assert_eq!(catalog.previous(0), Some(3));
        assert_eq!(catalog.previous(9), Some(3));
    }
}

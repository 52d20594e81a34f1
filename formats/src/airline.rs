//! Airline name resolution.
//!
//! The first three letters of a callsign are usually the ICAO designator of the operating
//! airline (`BAW` for British Airways, etc.).  We keep a small built-in table and allow a user
//! file with the same format to replace it.
//!

use std::collections::BTreeMap;
use std::fs;
use std::sync::OnceLock;

use serde::Deserialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{error, trace};

use crate::FormatError;

/// Label used when there is no callsign at all
pub const UNKNOWN_AIRLINE: &str = "Unknown";

/// Current airlines file version
const AIRLINES_FILE_VER: usize = 1;

/// Length of an ICAO airline designator
const PREFIX_LEN: usize = 3;

/// On-disk structure for the airlines file
///
#[derive(Debug, Deserialize)]
struct AirlinesFile {
    /// Version number for safety
    version: usize,
    /// ICAO designator to name
    airlines: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
pub struct AirlineResolver {
    table: BTreeMap<String, String>,
}

impl AirlineResolver {
    /// Use the built-in table
    ///
    pub fn builtin() -> Self {
        match Self::from_hcl(include_str!("airlines.hcl")) {
            Ok(r) => r,
            Err(e) => {
                error!("built-in airlines table: {e}");
                AirlineResolver {
                    table: BTreeMap::new(),
                }
            }
        }
    }

    /// Load a table from a file, replacing the built-in one
    ///
    #[tracing::instrument]
    pub fn from_file(fname: &str) -> Result<Self, FormatError> {
        trace!("load airlines from {fname}");

        let data = fs::read_to_string(fname).map_err(|e| FormatError::Airlines {
            path: fname.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_hcl(&data).map_err(|e| match e {
            FormatError::Airlines { reason, .. } => FormatError::Airlines {
                path: fname.to_string(),
                reason,
            },
            e => e,
        })
    }

    fn from_hcl(data: &str) -> Result<Self, FormatError> {
        let file: AirlinesFile = hcl::from_str(data).map_err(|e| FormatError::Airlines {
            path: "<builtin>".to_string(),
            reason: e.to_string(),
        })?;
        if file.version != AIRLINES_FILE_VER {
            return Err(FormatError::BadFileVersion(file.version));
        }

        let table = file
            .airlines
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
        Ok(AirlineResolver { table })
    }

    /// ICAO prefix of a callsign: first three characters of the trimmed, uppercased callsign.
    ///
    pub fn prefix(callsign: &str) -> Option<String> {
        let prefix: String = callsign
            .trim()
            .chars()
            .take(PREFIX_LEN)
            .collect::<String>()
            .to_uppercase();

        if prefix.is_empty() {
            None
        } else {
            Some(prefix)
        }
    }

    /// Carrier name for a callsign.
    ///
    /// Unknown prefixes are returned as-is and a missing or blank callsign gives
    /// `UNKNOWN_AIRLINE`, so we always have something to print.
    ///
    pub fn resolve(&self, callsign: Option<&str>) -> String {
        match callsign.and_then(Self::prefix) {
            Some(prefix) => match self.table.get(&prefix) {
                Some(name) => name.clone(),
                None => prefix,
            },
            None => UNKNOWN_AIRLINE.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// List loaded airlines
    ///
    pub fn list(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(["ICAO", "Airline"]);

        self.table.iter().for_each(|(code, name)| {
            builder.push_record([code.as_str(), name.as_str()]);
        });

        let all = builder.build().with(Style::modern()).to_string();
        format!("List all airlines ({}):\n{all}", self.len())
    }
}

impl Default for AirlineResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve with the built-in table
///
pub fn resolve(callsign: Option<&str>) -> String {
    static BUILTIN: OnceLock<AirlineResolver> = OnceLock::new();

    BUILTIN.get_or_init(AirlineResolver::builtin).resolve(callsign)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_builtin_loads() {
        let r = AirlineResolver::builtin();

        assert!(!r.is_empty());
        assert_eq!(Some("British Airways"), r.table.get("BAW").map(String::as_str));
    }

    #[rstest]
    #[case(Some("UAL123"), "United Airlines")]
    #[case(Some("  ual123  "), "United Airlines")]
    #[case(Some("BAW12"), "British Airways")]
    #[case(Some("ZZZ999"), "ZZZ")]
    #[case(Some("N12"), "N12")]
    #[case(Some("AB"), "AB")]
    #[case(Some(""), UNKNOWN_AIRLINE)]
    #[case(Some("    "), UNKNOWN_AIRLINE)]
    #[case(None, UNKNOWN_AIRLINE)]
    fn test_resolve(#[case] callsign: Option<&str>, #[case] res: &str) {
        assert_eq!(res, resolve(callsign));
    }

    #[rstest]
    #[case("swr12", Some("SWR"))]
    #[case(" D", Some("D"))]
    #[case("", None)]
    fn test_prefix(#[case] callsign: &str, #[case] res: Option<&str>) {
        assert_eq!(res.map(str::to_string), AirlineResolver::prefix(callsign));
    }

    fn write_airlines(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", content).unwrap();
        f
    }

    #[test]
    fn test_from_file() -> Result<(), FormatError> {
        let f = write_airlines("version = 1\nairlines = {\n  zzz = \"Zed Air\"\n}\n");

        let r = AirlineResolver::from_file(&f.path().to_string_lossy())?;
        assert_eq!(1, r.len());
        assert_eq!("Zed Air", r.resolve(Some("ZZZ999")));
        assert_eq!("UAL", r.resolve(Some("UAL123")));
        Ok(())
    }

    #[test]
    fn test_from_file_bad_version() {
        let f = write_airlines("version = 7\nairlines = {}\n");

        assert_eq!(
            Err(FormatError::BadFileVersion(7)),
            AirlineResolver::from_file(&f.path().to_string_lossy()).map(|r| r.len())
        );
    }

    #[test]
    fn test_from_file_missing() {
        assert!(AirlineResolver::from_file("/nonexistent/airlines.hcl").is_err());
    }

    #[test]
    fn test_list() {
        let s = AirlineResolver::builtin().list();

        assert!(s.contains("SWR"));
        assert!(s.contains("Swiss International Air Lines"));
    }
}

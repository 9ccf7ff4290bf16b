//! Region and prefix directory.
//!
//! Region names and zones come from the tz database tables; carriers,
//! geographic descriptions and zone overrides are keyed by E.164 prefix.
//! Both tables ship inside the binary and a user file can add prefixes.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::number::calling_code_for_region;
use super::types::{RegionEntry, UNKNOWN};

const BUILTIN_REGIONS: &str = include_str!("../../data/regions.toml");
const BUILTIN_PREFIXES: &str = include_str!("../../data/prefixes.toml");

#[derive(Debug, Clone, Deserialize)]
struct RegionFile {
    regions: BTreeMap<String, RegionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionInfo {
    pub name: String,
    #[serde(default)]
    pub timezones: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PrefixFile {
    #[serde(default)]
    prefixes: Vec<PrefixEntry>,
}

/// Data attached to one E.164 prefix; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrefixEntry {
    pub prefix: String,
    pub description: Option<String>,
    pub carrier: Option<String>,
    pub timezones: Option<Vec<String>>,
}

pub struct Directory {
    regions: BTreeMap<String, RegionInfo>,
    prefixes: HashMap<String, PrefixEntry>,
    longest_prefix: usize,
}

impl Directory {
    /// Directory backed by the tables compiled into the binary
    pub fn builtin() -> Result<Self> {
        let regions: RegionFile =
            toml::from_str(BUILTIN_REGIONS).context("Invalid builtin region table")?;
        let prefixes: PrefixFile =
            toml::from_str(BUILTIN_PREFIXES).context("Invalid builtin prefix table")?;

        let mut directory = Self {
            regions: regions.regions,
            prefixes: HashMap::new(),
            longest_prefix: 0,
        };
        directory.add_prefixes(prefixes.prefixes);

        debug!(
            target: "directory",
            "Loaded {} regions and {} prefixes",
            directory.regions.len(),
            directory.prefixes.len()
        );
        Ok(directory)
    }

    /// Builtin tables plus a user prefix file, whose entries win on conflict
    pub fn with_extra_prefixes(path: &Path) -> Result<Self> {
        let mut directory = Self::builtin()?;
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read prefix file {}", path.display()))?;
        let extra: PrefixFile = toml::from_str(&contents)
            .with_context(|| format!("Invalid prefix file {}", path.display()))?;

        info!(
            target: "directory",
            "Adding {} prefixes from {}",
            extra.prefixes.len(),
            path.display()
        );
        directory.add_prefixes(extra.prefixes);
        Ok(directory)
    }

    fn add_prefixes(&mut self, entries: Vec<PrefixEntry>) {
        for mut entry in entries {
            entry.prefix = entry
                .prefix
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect();
            if entry.prefix.is_empty() {
                continue;
            }
            self.longest_prefix = self.longest_prefix.max(entry.prefix.len());
            self.prefixes.insert(entry.prefix.clone(), entry);
        }
    }

    pub fn region(&self, code: &str) -> Option<&RegionInfo> {
        self.regions.get(&code.to_uppercase())
    }

    /// Display name for a region code, "Unknown" when the code is absent or unlisted
    pub fn country_name(&self, code: Option<&str>) -> String {
        code.and_then(|code| self.region(code))
            .map(|info| info.name.clone())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Zones for a number: the most specific prefix that lists zones, else
    /// the whole region's zones, else nothing.
    pub fn timezones_for(&self, digits: &str, region: Option<&str>) -> Vec<String> {
        if let Some(zones) = self.longest_match(digits, |entry| entry.timezones.as_ref()) {
            return zones.clone();
        }
        region
            .and_then(|code| self.region(code))
            .map(|info| info.timezones.clone())
            .unwrap_or_default()
    }

    pub fn description_for(&self, digits: &str) -> Option<&str> {
        self.longest_match(digits, |entry| entry.description.as_ref())
            .map(String::as_str)
    }

    pub fn carrier_for(&self, digits: &str) -> Option<&str> {
        self.longest_match(digits, |entry| entry.carrier.as_ref())
            .map(String::as_str)
    }

    /// Walk prefixes of `digits` from longest to shortest and return the
    /// first one that carries the field picked by `field`.
    fn longest_match<'a, T>(
        &'a self,
        digits: &str,
        field: impl Fn(&'a PrefixEntry) -> Option<&'a T>,
    ) -> Option<&'a T> {
        let max = digits.len().min(self.longest_prefix);
        (1..=max)
            .rev()
            .filter_map(|len| digits.get(..len))
            .filter_map(|prefix| self.prefixes.get(prefix))
            .find_map(field)
    }

    /// Every region the number metadata can dial, sorted by display name
    pub fn region_entries(&self) -> Vec<RegionEntry> {
        let mut entries: Vec<RegionEntry> = self
            .regions
            .iter()
            .filter_map(|(code, info)| {
                calling_code_for_region(code).map(|calling_code| RegionEntry {
                    code: code.clone(),
                    name: info.name.clone(),
                    calling_code,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_tables_load() {
        let directory = Directory::builtin().unwrap();
        assert_eq!(directory.country_name(Some("US")), "United States");
        assert_eq!(directory.country_name(Some("id")), "Indonesia");
        assert_eq!(directory.country_name(None), "Unknown");
        assert_eq!(directory.country_name(Some("XX")), "Unknown");
    }

    #[test]
    fn test_prefix_zones_beat_region_zones() {
        let directory = Directory::builtin().unwrap();

        let zones = directory.timezones_for("12135550100", Some("US"));
        assert_eq!(zones, vec!["America/Los_Angeles".to_string()]);

        // 1999 has no prefix entry, so the region's list applies
        let zones = directory.timezones_for("19995550100", Some("US"));
        assert_eq!(zones.first().map(String::as_str), Some("America/New_York"));
        assert!(zones.len() > 1);

        assert!(directory.timezones_for("99912345", None).is_empty());
    }

    #[test]
    fn test_russian_numbers_use_moscow_time() {
        let directory = Directory::builtin().unwrap();

        // mobile range
        let zones = directory.timezones_for("79161234567", Some("RU"));
        assert_eq!(zones, vec!["Europe/Moscow".to_string()]);

        // landline without a prefix entry falls back to the region list
        let zones = directory.timezones_for("73433001122", Some("RU"));
        assert_eq!(zones.first().map(String::as_str), Some("Europe/Moscow"));
        assert!(zones.iter().any(|z| z == "Europe/Kaliningrad"));
    }

    #[test]
    fn test_capital_zone_comes_first() {
        let directory = Directory::builtin().unwrap();
        let first = |code: &str| directory.region(code).and_then(|r| r.timezones.first().cloned());
        assert_eq!(first("AU").as_deref(), Some("Australia/Sydney"));
        assert_eq!(first("CA").as_deref(), Some("America/Toronto"));
        assert_eq!(first("BR").as_deref(), Some("America/Sao_Paulo"));
    }

    #[test]
    fn test_carrier_and_description_use_longest_prefix() {
        let directory = Directory::builtin().unwrap();
        assert_eq!(directory.carrier_for("6281234567890"), Some("Telkomsel"));
        assert_eq!(directory.carrier_for("6285712345678"), Some("IM3 Ooredoo"));
        assert_eq!(directory.description_for("6281234567890"), None);
        assert_eq!(directory.description_for("442071234567"), Some("London"));
        assert_eq!(directory.description_for("12025550123"), Some("Washington D.C."));
    }

    #[test]
    fn test_extra_prefix_file_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[prefixes]]
prefix = "+1 202"
description = "The District"

[[prefixes]]
prefix = "1202555"
carrier = "Test Telecom"
"#
        )
        .unwrap();

        let directory = Directory::with_extra_prefixes(file.path()).unwrap();
        assert_eq!(directory.description_for("12025550123"), Some("The District"));
        assert_eq!(directory.carrier_for("12025550123"), Some("Test Telecom"));
        // zones from the builtin entry are gone because the entry was replaced
        assert_eq!(
            directory.timezones_for("12025550123", Some("US")).first().map(String::as_str),
            Some("America/New_York")
        );
    }

    #[test]
    fn test_missing_extra_file_is_an_error() {
        let result = Directory::with_extra_prefixes(Path::new("/nonexistent/prefixes.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_region_entries_are_sorted_and_dialable() {
        let directory = Directory::builtin().unwrap();
        let entries = directory.region_entries();

        assert!(entries.len() > 200);
        assert!(entries.windows(2).all(|w| w[0].name <= w[1].name));
        let us = entries.iter().find(|e| e.code == "US").unwrap();
        assert_eq!(us.calling_code, 1);
    }
}

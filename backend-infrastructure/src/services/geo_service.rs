use std::net::Ipv4Addr;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;

use backend_domain::ports::GeoLookup;
use backend_domain::GeoInfo;

/// One row of the range file: an inclusive IPv4 range and its location.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoRangeEntry {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
    pub country: String,
    pub country_code: String,
    #[serde(default)]
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
struct GeoRange {
    start: u32,
    end: u32,
    info: GeoInfo,
}

/// In-memory IPv4 range table, sorted by range start.
#[derive(Debug, Default)]
pub struct GeoTable {
    ranges: Vec<GeoRange>,
}

impl GeoTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read geo table {}", path.display()))?;
        let entries: Vec<GeoRangeEntry> = serde_json::from_str(&content)
            .with_context(|| format!("invalid geo table {}", path.display()))?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<GeoRangeEntry>) -> Result<Self> {
        let mut ranges = Vec::with_capacity(entries.len());
        for entry in entries {
            let start = u32::from(entry.start);
            let end = u32::from(entry.end);
            if end < start {
                return Err(anyhow!("geo range {} - {} is reversed", entry.start, entry.end));
            }
            ranges.push(GeoRange {
                start,
                end,
                info: GeoInfo {
                    country: entry.country,
                    country_code: entry.country_code,
                    city: normalize_city(&entry.city),
                    latitude: entry.latitude,
                    longitude: entry.longitude,
                },
            });
        }
        ranges.sort_by_key(|range| range.start);
        // Lookup only inspects the last range starting at or below the address.
        if let Some(pair) = ranges.windows(2).find(|pair| pair[1].start <= pair[0].end) {
            return Err(anyhow!(
                "geo ranges {} - {} and {} - {} overlap",
                Ipv4Addr::from(pair[0].start),
                Ipv4Addr::from(pair[0].end),
                Ipv4Addr::from(pair[1].start),
                Ipv4Addr::from(pair[1].end),
            ));
        }
        Ok(Self { ranges })
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl GeoLookup for GeoTable {
    fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let address = u32::from(ip.trim().parse::<Ipv4Addr>().ok()?);
        let idx = self.ranges.partition_point(|range| range.start <= address);
        let range = self.ranges.get(idx.checked_sub(1)?)?;
        (address <= range.end).then(|| range.info.clone())
    }
}

/// Collapses every run of non-alphanumeric characters into one space.
pub fn normalize_city(city: &str) -> String {
    let mut out = String::with_capacity(city.len());
    let mut in_gap = false;
    for ch in city.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            in_gap = false;
        } else if !in_gap {
            out.push(' ');
            in_gap = true;
        }
    }
    out
}

use serde::{Deserialize, Serialize};

/// Reports endpoint response. A missing `data` key deserializes to an empty
/// list, which callers treat as "no report available".
#[derive(Debug, Deserialize)]
pub struct CovidReport {
    #[serde(default)]
    pub data: Vec<CovidRegionReport>,
}

/// One regional entry of a report; a country may span several.
#[derive(Debug, Clone, Deserialize)]
pub struct CovidRegionReport {
    #[serde(default)]
    pub active: i64,
    #[serde(default)]
    pub confirmed: i64,
    #[serde(default)]
    pub deaths: i64,
}

/// Country-level totals, summed across all regional entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CovidTotals {
    pub active: i64,
    pub confirmed: i64,
    pub deaths: i64,
}

impl CovidReport {
    /// Sum all entries into country totals; `None` when the report is empty.
    pub fn totals(&self) -> Option<CovidTotals> {
        if self.data.is_empty() {
            return None;
        }
        let mut totals = CovidTotals {
            active: 0,
            confirmed: 0,
            deaths: 0,
        };
        for entry in &self.data {
            totals.active += entry.active;
            totals.confirmed += entry.confirmed;
            totals.deaths += entry.deaths;
        }
        Some(totals)
    }
}

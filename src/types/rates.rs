use serde::Deserialize;

/// One entry of the NBP "table A" endpoint, which returns an array of tables.
/// Only the rate list is consumed; table metadata is ignored.
#[derive(Debug, Deserialize)]
pub struct ExchangeTable {
    pub rates: Vec<TableRate>,
}

/// A quoted currency in the daily table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableRate {
    pub currency: String,
    pub code: String,
    pub mid: f64,
}

/// Per-currency historical endpoint response.
#[derive(Debug, Deserialize)]
pub struct RateHistory {
    pub rates: Vec<HistoricalRate>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HistoricalRate {
    #[serde(rename = "effectiveDate")]
    pub effective_date: String,
    pub mid: f64,
}

use chrono::NaiveDate;
use tracing::warn;
use url::Url;

use crate::error::DashError;
use crate::types::rates::{ExchangeTable, HistoricalRate, RateHistory, TableRate};

/// Stateless client for the NBP exchange-rate endpoints.
///
/// Fetch failures of any kind (transport, non-2xx status, malformed JSON)
/// degrade to empty data after a warning; they are never surfaced to the
/// caller as errors.
pub struct RatesApi;

impl RatesApi {
    /// First `limit` entries of the first table in the daily "A" table
    /// response, in upstream order.
    pub async fn fetch_top_currencies(
        client: &reqwest::Client,
        base: &Url,
        limit: usize,
    ) -> Vec<TableRate> {
        match Self::try_fetch_tables(client, base).await {
            Ok(tables) => Self::top_rates(tables, limit),
            Err(e) => {
                warn!(error = %e, "rate table fetch failed");
                Vec::new()
            }
        }
    }

    /// First `limit` entries of the first table, in upstream order.
    fn top_rates(tables: Vec<ExchangeTable>, limit: usize) -> Vec<TableRate> {
        let Some(first) = tables.into_iter().next() else {
            warn!("rate table response contained no tables");
            return Vec::new();
        };
        let mut rates = first.rates;
        rates.truncate(limit);
        rates
    }

    /// Daily mid rates for one currency over `[start, end]`.
    pub async fn fetch_currency_history(
        client: &reqwest::Client,
        base: &Url,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<HistoricalRate> {
        match Self::try_fetch_history(client, base, code, start, end).await {
            Ok(history) => history.rates,
            Err(e) => {
                warn!(code, error = %e, "currency history fetch failed");
                Vec::new()
            }
        }
    }

    async fn try_fetch_tables(
        client: &reqwest::Client,
        base: &Url,
    ) -> Result<Vec<ExchangeTable>, DashError> {
        let url = base.join("exchangerates/tables/A?format=json")?;
        let tables = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(tables)
    }

    async fn try_fetch_history(
        client: &reqwest::Client,
        base: &Url,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RateHistory, DashError> {
        let url = base.join(&format!(
            "exchangerates/rates/A/{code}/{start}/{end}/?format=json"
        ))?;
        let history = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(history)
    }
}

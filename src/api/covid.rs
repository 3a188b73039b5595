use tracing::warn;
use url::Url;

use crate::error::DashError;
use crate::types::covid::{CovidReport, CovidTotals};

/// Stateless client for the covid-api.com reports endpoint.
pub struct CovidApi;

impl CovidApi {
    /// Country totals for one `(iso, date)` pair, summed across regional
    /// entries. `None` when the report is empty, missing, or the fetch fails.
    pub async fn fetch_report(
        client: &reqwest::Client,
        base: &Url,
        iso: &str,
        date: &str,
    ) -> Option<CovidTotals> {
        match Self::try_fetch_report(client, base, iso, date).await {
            Ok(report) => report.totals(),
            Err(e) => {
                warn!(country = iso, error = %e, "covid report fetch failed");
                None
            }
        }
    }

    async fn try_fetch_report(
        client: &reqwest::Client,
        base: &Url,
        iso: &str,
        date: &str,
    ) -> Result<CovidReport, DashError> {
        let url = base.join("reports")?;
        let report = client
            .get(url)
            .query(&[("date", date), ("iso", iso)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(report)
    }
}

use std::collections::HashMap;

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::{Duration, Utc};
use tracing::debug;

use crate::api::covid::CovidApi;
use crate::api::rates::RatesApi;
use crate::error::DashError;
use crate::middleware::auth::SessionUser;
use crate::middleware::flash::take_flash;
use crate::router::DashState;
use crate::service::chart;
use crate::types::rates::TableRate;
use crate::views::{self, CurrencyCard};

/// GET /dashboard. Consumes any pending flash (e.g. the login greeting) so
/// it cannot surface stale on a later visit to the auth pages.
pub async fn dashboard_home(
    State(state): State<DashState>,
    user: SessionUser,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar);
    (
        jar,
        Html(views::dashboard_page(
            &user.username,
            state.cfg.covid_enabled,
            flash.as_ref(),
        )),
    )
}

/// GET /dashboard/currencies -> empty state with a refresh form.
pub async fn currencies_page(State(state): State<DashState>, user: SessionUser) -> Html<String> {
    Html(views::currencies_page(
        &user.username,
        state.cfg.covid_enabled,
        &[],
    ))
}

/// POST /dashboard/currencies -> fetch the top currencies, merge each
/// currency's trailing history into storage, then render one line chart per
/// currency with data. Upstream failures degrade to an empty page section.
pub async fn currencies_refresh(
    State(state): State<DashState>,
    user: SessionUser,
) -> Result<Html<String>, DashError> {
    let cfg = state.cfg.as_ref();

    let mut top = RatesApi::fetch_top_currencies(
        &state.client,
        &cfg.rates_api_base,
        cfg.top_currency_limit,
    )
    .await;

    let end = Utc::now().date_naive();
    let start = end - Duration::days(cfg.history_window_days);

    let mut histories: HashMap<String, Vec<(String, f64)>> = HashMap::new();
    for rate in &top {
        let history = RatesApi::fetch_currency_history(
            &state.client,
            &cfg.rates_api_base,
            &rate.code,
            start,
            end,
        )
        .await;
        if history.is_empty() {
            continue;
        }
        let points: Vec<(String, f64)> = history
            .into_iter()
            .map(|r| (r.effective_date, r.mid))
            .collect();
        let inserted = state.storage.merge_rate_history(&rate.code, &points).await?;
        debug!(code = %rate.code, fetched = points.len(), inserted, "synced currency history");
        histories.insert(rate.code.clone(), points);
    }

    sort_by_mid_desc(&mut top);

    let mut cards = Vec::with_capacity(top.len());
    for rate in top {
        let chart = match histories.get(&rate.code) {
            Some(points) => Some(chart::render_line_chart(
                &format!("{} to PLN (Last {} Days)", rate.code, cfg.history_window_days),
                points,
            )?),
            None => None,
        };
        cards.push(CurrencyCard {
            code: rate.code,
            currency: rate.currency,
            mid: rate.mid,
            chart,
        });
    }

    Ok(Html(views::currencies_page(
        &user.username,
        cfg.covid_enabled,
        &cards,
    )))
}

/// GET /dashboard/covid -> empty state with a refresh form.
pub async fn covid_page(State(state): State<DashState>, user: SessionUser) -> Html<String> {
    Html(views::covid_page(
        &user.username,
        state.cfg.covid_enabled,
        &state.cfg.covid_report_date,
        &[],
        None,
    ))
}

/// POST /dashboard/covid -> fetch and upsert totals for each configured
/// country, then render a bar chart of total deaths across all stored
/// records for the report date. Countries without a report are skipped.
pub async fn covid_refresh(
    State(state): State<DashState>,
    user: SessionUser,
) -> Result<Html<String>, DashError> {
    let cfg = state.cfg.as_ref();

    for iso in &cfg.covid_countries {
        match CovidApi::fetch_report(&state.client, &cfg.covid_api_base, iso, &cfg.covid_report_date)
            .await
        {
            Some(totals) => {
                state
                    .storage
                    .upsert_covid_totals(iso, &cfg.covid_report_date, &totals)
                    .await?;
                debug!(country = %iso, "synced covid totals");
            }
            None => debug!(country = %iso, "no covid report available"),
        }
    }

    let records = state
        .storage
        .covid_records_for_date(&cfg.covid_report_date)
        .await?;

    let chart = if records.is_empty() {
        None
    } else {
        let labels: Vec<String> = records.iter().map(|r| r.country.clone()).collect();
        let values: Vec<f64> = records.iter().map(|r| r.total_deaths as f64).collect();
        Some(chart::render_bar_chart(
            &format!("Total COVID-19 deaths ({})", cfg.covid_report_date),
            &labels,
            &values,
        )?)
    };

    Ok(Html(views::covid_page(
        &user.username,
        cfg.covid_enabled,
        &cfg.covid_report_date,
        &records,
        chart.as_deref(),
    )))
}

/// Display order for the currency list: highest mid rate first.
fn sort_by_mid_desc(rates: &mut [TableRate]) {
    rates.sort_by(|a, b| {
        b.mid
            .partial_cmp(&a.mid)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(code: &str, mid: f64) -> TableRate {
        TableRate {
            currency: code.to_lowercase(),
            code: code.to_string(),
            mid,
        }
    }

    #[test]
    fn currencies_are_sorted_by_rate_descending() {
        let mut rates = vec![rate("USD", 4.0), rate("EUR", 4.5)];
        sort_by_mid_desc(&mut rates);

        let codes: Vec<&str> = rates.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["EUR", "USD"]);
    }

    #[test]
    fn sort_tolerates_equal_rates() {
        let mut rates = vec![rate("USD", 4.0), rate("AUD", 4.0), rate("EUR", 4.5)];
        sort_by_mid_desc(&mut rates);
        assert_eq!(rates[0].code, "EUR");
    }
}

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

/// Runtime configuration, loaded from defaults overridden by `FXDASH_*`
/// environment variables (a `.env` file is honored via dotenvy in main).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Base key for the private session/flash cookies. Must be at least
    /// 64 bytes; shorter or absent secrets fall back to an ephemeral key.
    pub session_secret: Option<String>,
    pub http_timeout_secs: u64,
    pub rates_api_base: Url,
    pub covid_api_base: Url,
    /// Gates the COVID-19 module: routes and navigation links.
    pub covid_enabled: bool,
    pub covid_countries: Vec<String>,
    /// Report date queried on the COVID view, ISO yyyy-mm-dd.
    pub covid_report_date: String,
    pub top_currency_limit: usize,
    pub history_window_days: i64,
    /// Deletes the database file on startup. Demo behavior, off by default.
    pub reset_db_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:fxdash.db".to_string(),
            listen_addr: "0.0.0.0:5000".to_string(),
            loglevel: "info".to_string(),
            session_secret: None,
            http_timeout_secs: 15,
            rates_api_base: Url::parse("https://api.nbp.pl/api/").expect("valid default rates URL"),
            covid_api_base: Url::parse("https://covid-api.com/api/")
                .expect("valid default covid URL"),
            covid_enabled: true,
            covid_countries: ["POL", "DEU", "FRA", "CZE", "GBR"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            covid_report_date: "2023-03-09".to_string(),
            top_currency_limit: 10,
            history_window_days: 31,
            reset_db_on_start: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("FXDASH_"))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_api_bases_end_with_slash() {
        // Url::join treats the last path segment as a file without it.
        let cfg = Config::default();
        assert!(cfg.rates_api_base.as_str().ends_with('/'));
        assert!(cfg.covid_api_base.as_str().ends_with('/'));
    }
}

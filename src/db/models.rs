use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// One quoted mid rate for a currency on a trading day. Insert-only:
/// rows are never revised after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CurrencyRate {
    pub id: i64,
    pub code: String,
    pub date: String,
    pub mid_rate: f64,
}

/// Country totals for one report date. Overwritten in place on re-sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct CovidRecord {
    pub id: i64,
    pub date: String,
    pub country: String,
    pub active_cases: i64,
    pub total_cases: i64,
    pub total_deaths: i64,
}

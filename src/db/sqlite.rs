use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::db::models::{CovidRecord, CurrencyRate, User};
use crate::db::schema::SQLITE_INIT;
use crate::error::DashError;
use crate::types::covid::CovidTotals;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database behind `database_url` and
    /// initialize the schema.
    pub async fn connect(database_url: &str) -> Result<Self, DashError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), DashError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new user. A unique violation on `username` maps to the
    /// `DuplicateUsername` domain error. Returns the row id.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, DashError> {
        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await;
        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DashError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>, DashError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert-only merge of a fetched rate history for one currency.
    ///
    /// Runs in a single transaction: each `(date, mid)` pair is looked up by
    /// `(code, date)` and inserted only when absent. Existing rows are never
    /// corrected, even when the fetched rate differs from the stored one.
    /// Returns the number of rows inserted.
    pub async fn merge_rate_history(
        &self,
        code: &str,
        points: &[(String, f64)],
    ) -> Result<u64, DashError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;

        for (date, mid) in points {
            let existing: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM currency_rates WHERE code = ? AND date = ?")
                    .bind(code)
                    .bind(date)
                    .fetch_optional(&mut *tx)
                    .await?;
            if existing.is_some() {
                continue;
            }
            sqlx::query("INSERT INTO currency_rates (code, date, mid_rate) VALUES (?, ?, ?)")
                .bind(code)
                .bind(date)
                .bind(*mid)
                .execute(&mut *tx)
                .await?;
            inserted += 1;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Upsert the totals for one `(date, country)` pair: the three numeric
    /// fields are overwritten in place when the row exists, inserted
    /// otherwise. One transaction per country.
    pub async fn upsert_covid_totals(
        &self,
        country: &str,
        date: &str,
        totals: &CovidTotals,
    ) -> Result<(), DashError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM covid_records WHERE date = ? AND country = ?")
                .bind(date)
                .bind(country)
                .fetch_optional(&mut *tx)
                .await?;

        match existing {
            Some((id,)) => {
                sqlx::query(
                    "UPDATE covid_records SET active_cases = ?, total_cases = ?, total_deaths = ? WHERE id = ?",
                )
                .bind(totals.active)
                .bind(totals.confirmed)
                .bind(totals.deaths)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO covid_records (date, country, active_cases, total_cases, total_deaths) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(date)
                .bind(country)
                .bind(totals.active)
                .bind(totals.confirmed)
                .bind(totals.deaths)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Stored history for one currency, oldest first.
    pub async fn rate_history_for_code(&self, code: &str) -> Result<Vec<CurrencyRate>, DashError> {
        let rows = sqlx::query_as::<_, CurrencyRate>(
            "SELECT id, code, date, mid_rate FROM currency_rates WHERE code = ? ORDER BY date",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn covid_records_for_date(&self, date: &str) -> Result<Vec<CovidRecord>, DashError> {
        let rows = sqlx::query_as::<_, CovidRecord>(
            r#"SELECT id, date, country, active_cases, total_cases, total_deaths
               FROM covid_records WHERE date = ? ORDER BY country"#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

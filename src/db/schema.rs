//! SQL DDL for initializing the dashboard storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `users.username` UNIQUE (registration collisions surface as DB errors)
/// - `currency_rates` deliberately carries NO unique constraint on
///   `(code, date)`: uniqueness is enforced by lookup-before-insert in the
///   merge logic, the index below exists only for lookup speed
/// - `covid_records` likewise keeps `(date, country)` uniqueness in
///   application logic; rows are overwritten in place on re-sync
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS currency_rates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL,
    date TEXT NOT NULL, -- ISO yyyy-mm-dd
    mid_rate REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_currency_rates_code_date ON currency_rates(code, date);

CREATE TABLE IF NOT EXISTS covid_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL, -- ISO yyyy-mm-dd
    country TEXT NOT NULL,
    active_cases INTEGER NOT NULL,
    total_cases INTEGER NOT NULL,
    total_deaths INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_covid_records_date_country ON covid_records(date, country);
"#;

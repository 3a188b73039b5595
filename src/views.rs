//! HTML page composition. Pages are small enough that string building
//! beats pulling in a template engine.

use crate::db::models::CovidRecord;
use crate::middleware::flash::Flash;

pub struct CurrencyCard {
    pub code: String,
    pub currency: String,
    pub mid: f64,
    pub chart: Option<String>,
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2em auto; max-width: 960px; color: #222; }
nav a { margin-right: 1em; }
form.auth { max-width: 20em; }
form.auth input { display: block; width: 100%; margin: 0.4em 0 1em; padding: 0.4em; }
.flash { padding: 0.6em 1em; border-radius: 4px; }
.flash.success { background: #e2f5e6; color: #1d643b; }
.flash.danger { background: #fbe4e4; color: #8a1f1f; }
.card { border: 1px solid #ddd; border-radius: 4px; padding: 1em; margin: 1em 0; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ccc; padding: 0.3em 0.8em; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{} - fxdash</title>
<style>{}</style>
</head>
<body>
{}
</body>
</html>"#,
        escape(title),
        STYLE,
        body
    )
}

fn flash_banner(flash: Option<&Flash>) -> String {
    match flash {
        Some(f) => format!(
            r#"<p class="flash {}">{}</p>"#,
            escape(&f.category),
            escape(&f.message)
        ),
        None => String::new(),
    }
}

fn nav(username: &str, covid_enabled: bool) -> String {
    let covid_link = if covid_enabled {
        r#"<a href="/dashboard/covid">COVID-19</a>"#
    } else {
        ""
    };
    format!(
        r#"<nav>
<a href="/dashboard">Dashboard</a>
<a href="/dashboard/currencies">Currencies</a>
{}
<a href="/logout">Log out ({})</a>
</nav>
<hr>"#,
        covid_link,
        escape(username)
    )
}

pub fn login_page(flash: Option<&Flash>) -> String {
    let body = format!(
        r#"{}
<h1>Log in</h1>
<form class="auth" method="post" action="/login">
<label>Username<input type="text" name="username" required></label>
<label>Password<input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/register">Register</a>.</p>"#,
        flash_banner(flash)
    );
    layout("Log in", &body)
}

pub fn register_page(flash: Option<&Flash>) -> String {
    let body = format!(
        r#"{}
<h1>Register</h1>
<form class="auth" method="post" action="/register">
<label>Username<input type="text" name="username" required></label>
<label>Password<input type="password" name="password" required></label>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Log in</a>.</p>"#,
        flash_banner(flash)
    );
    layout("Register", &body)
}

pub fn dashboard_page(username: &str, covid_enabled: bool, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"{}
{}
<h1>Dashboard</h1>
<p>Welcome, {}. Pick a section above.</p>"#,
        nav(username, covid_enabled),
        flash_banner(flash),
        escape(username)
    );
    layout("Dashboard", &body)
}

pub fn currencies_page(username: &str, covid_enabled: bool, cards: &[CurrencyCard]) -> String {
    let mut body = format!(
        r#"{}
<h1>Exchange rates</h1>
<form method="post" action="/dashboard/currencies">
<button type="submit">Refresh rates</button>
</form>"#,
        nav(username, covid_enabled)
    );

    if cards.is_empty() {
        body.push_str(
            r#"<p class="empty">No currency data loaded. Use "Refresh rates" to fetch the latest table.</p>"#,
        );
    } else {
        for card in cards {
            body.push_str(&format!(
                r#"<div class="card">
<h2>{} &mdash; {}</h2>
<p>Mid rate: {:.4} PLN</p>
{}
</div>"#,
                escape(&card.code),
                escape(&card.currency),
                card.mid,
                chart_img(card.chart.as_deref(), &card.code)
            ));
        }
    }

    layout("Currencies", &body)
}

pub fn covid_page(
    username: &str,
    covid_enabled: bool,
    date: &str,
    records: &[CovidRecord],
    chart: Option<&str>,
) -> String {
    let mut body = format!(
        r#"{}
<h1>COVID-19 report ({})</h1>
<form method="post" action="/dashboard/covid">
<button type="submit">Refresh report</button>
</form>"#,
        nav(username, covid_enabled),
        escape(date)
    );

    if records.is_empty() {
        body.push_str(
            r#"<p class="empty">No COVID-19 records for this date. Use "Refresh report" to fetch them.</p>"#,
        );
    } else {
        body.push_str(&chart_img(chart, "total deaths"));
        body.push_str(
            "<table><tr><th>Country</th><th>Active</th><th>Confirmed</th><th>Deaths</th></tr>",
        );
        for r in records {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&r.country),
                r.active_cases,
                r.total_cases,
                r.total_deaths
            ));
        }
        body.push_str("</table>");
    }

    layout("COVID-19", &body)
}

fn chart_img(chart: Option<&str>, alt: &str) -> String {
    match chart {
        Some(b64) => format!(
            r#"<img src="data:image/png;base64,{}" alt="Chart: {}">"#,
            b64,
            escape(alt)
        ),
        None => String::new(),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

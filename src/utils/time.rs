use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Calendar date used for sitemap `<lastmod>` entries.
pub fn today_iso_date() -> String {
    now().format("%Y-%m-%d").to_string()
}

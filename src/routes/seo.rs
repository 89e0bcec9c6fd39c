use axum::{extract::State, http::header, response::IntoResponse};
use url::Url;

use crate::utils::time::today_iso_date;
use crate::AppState;

pub fn render_sitemap(site_url: &Url, lastmod: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url>
        <loc>{}</loc>
        <lastmod>{}</lastmod>
        <changefreq>weekly</changefreq>
        <priority>1.0</priority>
    </url>
</urlset>"#,
        site_url, lastmod
    )
}

pub fn render_robots(site_url: &Url) -> String {
    let sitemap = site_url
        .join("sitemap.xml")
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("{}sitemap.xml", site_url));
    format!("User-agent: *\nAllow: /\n\nSitemap: {}", sitemap)
}

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        render_sitemap(&state.config.site_url, &today_iso_date()),
    )
}

pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        render_robots(&state.config.site_url),
    )
}

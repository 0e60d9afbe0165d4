//! Summary image (SVG) regenerated after each refresh and cached on disk.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::database_ops::store::Country;
use crate::query::compare_gdp_desc;

pub const SUMMARY_FILE: &str = "summary.svg";
pub const CONTENT_TYPE: &str = "image/svg+xml";
const TOP_N: usize = 5;
const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

#[derive(Debug, Clone)]
pub struct SummaryRenderer {
    cache_dir: PathBuf,
}

impl SummaryRenderer {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn image_path(&self) -> PathBuf {
        self.cache_dir.join(SUMMARY_FILE)
    }

    /// Render the listing and replace the cached image.
    pub async fn write(&self, countries: &[Country]) -> io::Result<PathBuf> {
        let svg = render_svg(countries, Utc::now());
        tokio::fs::create_dir_all(&self.cache_dir).await?;
        let path = self.image_path();
        // write-then-rename so readers never see a half-written file
        let tmp = self.cache_dir.join(format!("{SUMMARY_FILE}.tmp"));
        tokio::fs::write(&tmp, svg.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;
        info!(path = %path.display(), total = countries.len(), "summary image written");
        Ok(path)
    }

    /// Cached image bytes, `None` when no image was generated yet.
    pub async fn load(&self) -> io::Result<Option<Vec<u8>>> {
        read_optional(&self.image_path()).await
    }
}

async fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Top `n` countries by estimated GDP, highest first.
pub fn top_by_gdp(countries: &[Country], n: usize) -> Vec<&Country> {
    let mut ranked: Vec<&Country> = countries.iter().collect();
    ranked.sort_by(|a, b| compare_gdp_desc(a, b));
    ranked.truncate(n);
    ranked
}

pub fn render_svg(countries: &[Country], now: DateTime<Utc>) -> String {
    let last_refresh = countries
        .iter()
        .map(|c| c.last_refreshed_at)
        .max()
        .unwrap_or(now);

    let mut lines: Vec<(u32, u32, u32, &'static str, String)> = vec![
        (50, 50, 32, "#000", "Countries Summary".to_string()),
        (50, 100, 24, "#000", format!("Total Countries: {}", countries.len())),
        (
            50,
            140,
            24,
            "#000",
            format!("Last Refreshed: {}", last_refresh.format("%Y-%m-%d %H:%M:%S UTC")),
        ),
    ];

    if countries.is_empty() {
        lines.push((50, 240, 24, "#c00", "No countries data available.".to_string()));
    } else {
        lines.push((50, 200, 24, "#000", format!("Top {TOP_N} Countries by Estimated GDP:")));
        let mut y = 240;
        for (i, c) in top_by_gdp(countries, TOP_N).into_iter().enumerate() {
            lines.push((70, y, 18, "#000", format!("{}. {}: {}", i + 1, c.name, format_usd(c.estimated_gdp))));
            y += 35;
        }
    }

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(svg, r##"<rect width="100%" height="100%" fill="#fff"/>"##);
    for (x, y, size, fill, text) in lines {
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" font-family="Arial, Helvetica, sans-serif" font-size="{size}" fill="{fill}">{}</text>"#,
            escape_xml(&text)
        );
    }
    svg.push_str("</svg>\n");
    svg
}

/// `$1,234,567.89`; zero renders as `N/A`.
pub fn format_usd(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "N/A".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_ops::store::NewCountry;
    use chrono::TimeZone;

    fn country(name: &str, gdp: f64, at: DateTime<Utc>) -> Country {
        NewCountry {
            name: name.into(),
            capital: None,
            region: None,
            population: 1,
            currency_code: "X".into(),
            exchange_rate: Some(1.0),
            estimated_gdp: gdp,
            flag_url: None,
        }
        .stamped(at)
    }

    #[test]
    fn formats_usd_with_grouping() {
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.5), "$999.50");
        assert_eq!(format_usd(1000.0), "$1,000.00");
        assert_eq!(format_usd(0.0), "N/A");
    }

    #[test]
    fn picks_top_five_by_gdp() {
        let at = Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap();
        let list: Vec<Country> = (1..=7).map(|i| country(&format!("C{i}"), i as f64 * 10.0, at)).collect();
        let top: Vec<_> = top_by_gdp(&list, TOP_N).iter().map(|c| c.name.clone()).collect();
        assert_eq!(top, ["C7", "C6", "C5", "C4", "C3"]);
    }

    #[test]
    fn svg_contains_totals_timestamp_and_escaped_names() {
        let at = Utc.with_ymd_and_hms(2025, 10, 1, 12, 30, 5).unwrap();
        let list = vec![country("Trinidad & Tobago", 5000.0, at), country("B", 10.0, at)];
        let svg = render_svg(&list, Utc::now());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Total Countries: 2"));
        assert!(svg.contains("Last Refreshed: 2025-10-01 12:30:05 UTC"));
        assert!(svg.contains("1. Trinidad &amp; Tobago: $5,000.00"));
        assert!(svg.contains("2. B: $10.00"));
    }

    #[test]
    fn svg_for_empty_listing() {
        let svg = render_svg(&[], Utc::now());
        assert!(svg.contains("Total Countries: 0"));
        assert!(svg.contains("No countries data available."));
    }

    #[tokio::test]
    async fn write_then_load_round_trips_through_cache_dir() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = SummaryRenderer::new(dir.path().join("cache"));
        assert!(renderer.load().await.unwrap().is_none());

        let at = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let path = renderer.write(&[country("A", 1.0, at)]).await.unwrap();
        assert!(path.ends_with(SUMMARY_FILE));

        let bytes = renderer.load().await.unwrap().expect("image present");
        assert!(String::from_utf8(bytes).unwrap().contains("Total Countries: 1"));
    }
}

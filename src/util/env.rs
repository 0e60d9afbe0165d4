//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in each binary (or rely on lazy Once).
use std::str::FromStr;
use std::sync::Once;
use tracing::info;

static INIT: Once = Once::new();

/// Load .env exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        if dotenv::dotenv().is_ok() {
            return;
        }
        // Fallback to the Cargo project root when started from elsewhere
        let candidate = format!("{}/.env", env!("CARGO_MANIFEST_DIR"));
        let _ = dotenv::from_filename(candidate);
    });
}

/// Get optional env var (None if unset or empty).
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Get parsed value with default fallback.
pub fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Clone,
{
    init_env();
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Boolean flag; accepts 1/true/on/yes (case-insensitive) as true.
pub fn env_flag(key: &str, default: bool) -> bool {
    init_env();
    match std::env::var(key) {
        Ok(raw) => {
            let v = raw.trim().to_ascii_lowercase();
            matches!(v.as_str(), "1" | "true" | "on" | "yes")
        }
        Err(_) => default,
    }
}

/// Database URL: explicit DSN first, then one composed from DB_* parts.
pub fn db_url() -> anyhow::Result<String> {
    init_env();
    for k in ["DATABASE_URL", "DB_URL"] {
        if let Some(v) = env_opt(k) {
            return Ok(v);
        }
    }

    if let Some(dsn) = build_dsn_from_parts() {
        info!(target = "env", "using DSN composed from DB_* variables");
        return Ok(dsn);
    }

    Err(anyhow::anyhow!(
        "no database URL configured; set DATABASE_URL (postgres:// or sqlite:) or DB_HOST/DB_USERNAME"
    ))
}

fn build_dsn_from_parts() -> Option<String> {
    let host = env_opt("DB_HOST")?;
    let user = env_opt("DB_USERNAME")?;
    let password = env_opt("DB_PASSWORD");
    let database = env_opt("DB_DATABASE").unwrap_or_else(|| "countries_db".into());
    let port = env_opt("DB_PORT").unwrap_or_else(|| "5432".into());
    let ssl_mode = env_opt("DB_SSLMODE").unwrap_or_else(|| "prefer".into());
    compose_postgres_dsn(&host, &user, password.as_deref(), &database, &port, &ssl_mode)
}

/// Build a Postgres DSN through `url::Url` so credentials are percent-encoded.
fn compose_postgres_dsn(
    host: &str,
    user: &str,
    password: Option<&str>,
    database: &str,
    port: &str,
    ssl_mode: &str,
) -> Option<String> {
    let port_u16: u16 = port.trim().parse::<u16>().unwrap_or(5432);

    let mut out = url::Url::parse("postgresql://localhost").ok()?;
    out.set_username(user).ok()?;
    if let Some(pass) = password {
        out.set_password(Some(pass)).ok()?;
    }

    let host_trimmed = host.trim().trim_matches(|c| c == '[' || c == ']');
    if host_trimmed.contains(':') {
        out.set_host(Some(&format!("[{}]", host_trimmed))).ok()?;
    } else {
        out.set_host(Some(host_trimmed)).ok()?;
    }

    out.set_port(Some(port_u16)).ok()?;
    out.set_path(&format!("/{database}"));

    if ssl_mode != "disable" {
        out.query_pairs_mut().append_pair("sslmode", ssl_mode);
    }

    Some(out.to_string())
}

pub fn redact_value(key: &str, val: &str) -> String {
    let k = key.to_ascii_uppercase();
    if k.contains("PASSWORD") || k.contains("SECRET") || k.contains("KEY") || k.contains("TOKEN") {
        return "***".to_string();
    }

    let val_trim = val.trim();

    // Always redact postgres DSNs even if the key isn't obviously sensitive.
    if let Ok(mut u) = url::Url::parse(val_trim) {
        let scheme = u.scheme().to_ascii_lowercase();
        if (scheme == "postgres" || scheme == "postgresql") && !u.username().is_empty() {
            let _ = u.set_username("***");
            let _ = u.set_password(Some("***"));
            return u.to_string();
        }
    }

    val_trim.to_string()
}

/// Validate required keys and log a consolidated, redacted snapshot of configuration.
/// Returns error if any required key is missing.
pub fn preflight_check(title: &str, required: &[&str], also_log: &[&str]) -> anyhow::Result<()> {
    init_env();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|k| env_opt(k).is_none())
        .collect();
    let snapshot: Vec<(String, String)> = also_log
        .iter()
        .map(|&k| {
            let v = env_opt(k).unwrap_or_default();
            (k.to_string(), redact_value(k, &v))
        })
        .collect();
    info!(target = "preflight", title, snapshot = ?snapshot, "configuration snapshot");
    if !missing.is_empty() {
        return Err(anyhow::anyhow!("missing required env: {:?}", missing));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_dsn_with_encoded_password() {
        let dsn = compose_postgres_dsn("db.local", "root", Some("p@ss?word"), "countries_db", "5433", "require")
            .expect("dsn");
        assert!(dsn.starts_with("postgresql://root:"));
        assert!(dsn.contains("p%40ss%3Fword"));
        assert!(dsn.contains("@db.local:5433/countries_db"));
        assert!(dsn.ends_with("sslmode=require"));
    }

    #[test]
    fn composes_dsn_for_ipv6_host_without_ssl() {
        let dsn = compose_postgres_dsn("::1", "app", None, "db", "5432", "disable").expect("dsn");
        assert_eq!(dsn, "postgresql://app@[::1]:5432/db");
    }

    #[test]
    fn redacts_secrets_and_dsn_credentials() {
        assert_eq!(redact_value("DB_PASSWORD", "hunter2"), "***");
        let redacted = redact_value("DATABASE_URL", "postgres://user:pw@host:5432/db");
        assert!(!redacted.contains("pw"));
        assert!(redacted.contains("host:5432/db"));
        assert_eq!(redact_value("DATABASE_URL", "sqlite::memory:"), "sqlite::memory:");
        assert_eq!(redact_value("API_PORT", " 3000 "), "3000");
    }
}

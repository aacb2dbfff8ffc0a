use chrono::FixedOffset;

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Secret the session cookie is sealed with (at least 32 characters).
    pub password: String,
    /// Lifetime of a sealed session in seconds.
    pub ttl_secs: i64,
    /// Mark the cookie `Secure` (serve over HTTPS only).
    pub cookie_secure: bool,
}

/// Server configuration loaded from environment variables.
///
/// Everything except the backend URL and the session password has a default
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Backend origin for login and the client registry.
    pub base_url: String,
    /// Backend origin for queue operations.
    pub api_url: String,
    /// Origin used when building shareable `/fila/` links.
    pub public_url: String,
    pub session: SessionConfig,
    /// Support contact shown on the login view.
    pub support_link: Option<String>,
    /// Delay the UI waits before refetching after a mutation.
    pub reload_delay_ms: u64,
    /// Offset applied when bucketing entries into report days.
    pub report_utc_offset_minutes: i32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `BASE_URL`                  | required                   |
    /// | `API_URL`                   | value of `BASE_URL`        |
    /// | `PUBLIC_URL`                | value of `BASE_URL`        |
    /// | `SESSION_PASSWORD`          | required, >= 32 chars      |
    /// | `SESSION_TTL_SECS`          | `1209600` (14 days)        |
    /// | `COOKIE_SECURE`             | `false`                    |
    /// | `SUPPORT_LINK`              | unset                      |
    /// | `RELOAD_DELAY_MS`           | `2000`                     |
    /// | `REPORT_UTC_OFFSET_MINUTES` | `-180`                     |
    ///
    /// Panics on missing or malformed values so misconfiguration fails at
    /// startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let base_url = std::env::var("BASE_URL").expect("BASE_URL must be set");
        let api_url = std::env::var("API_URL").unwrap_or_else(|_| base_url.clone());
        let public_url = std::env::var("PUBLIC_URL").unwrap_or_else(|_| base_url.clone());

        let password = std::env::var("SESSION_PASSWORD").expect("SESSION_PASSWORD must be set");
        assert!(
            password.chars().count() >= fila_core::seal::MIN_PASSWORD_LEN,
            "SESSION_PASSWORD must be at least {} characters",
            fila_core::seal::MIN_PASSWORD_LEN
        );

        let ttl_secs: i64 = std::env::var("SESSION_TTL_SECS")
            .unwrap_or_else(|_| fila_core::seal::DEFAULT_TTL_SECS.to_string())
            .parse()
            .expect("SESSION_TTL_SECS must be a valid i64");

        let cookie_secure = parse_flag(&std::env::var("COOKIE_SECURE").unwrap_or_default());

        let support_link = std::env::var("SUPPORT_LINK")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let reload_delay_ms: u64 = std::env::var("RELOAD_DELAY_MS")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("RELOAD_DELAY_MS must be a valid u64");

        let report_utc_offset_minutes: i32 = std::env::var("REPORT_UTC_OFFSET_MINUTES")
            .unwrap_or_else(|_| "-180".into())
            .parse()
            .expect("REPORT_UTC_OFFSET_MINUTES must be a valid i32");

        let config = Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            base_url,
            api_url,
            public_url,
            session: SessionConfig {
                password,
                ttl_secs,
                cookie_secure,
            },
            support_link,
            reload_delay_ms,
            report_utc_offset_minutes,
        };
        config
            .report_offset()
            .expect("REPORT_UTC_OFFSET_MINUTES must be within +/- 24 hours");
        config
    }

    /// The report offset as a [`FixedOffset`], `None` when out of range.
    pub fn report_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.report_utc_offset_minutes * 60)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use anyhow::Context;
use goldwatch_market_data::cache::DEFAULT_PRICE_TTL;

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Default cache TTL, applied to price entries
    pub cache_ttl: Duration,
    pub metal_price_api_key: Option<String>,
    pub news_api_key: Option<String>,
    /// Serve the static bundle for non-API paths
    pub serve_static: bool,
    pub static_dir: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT: {:?}", raw))?,
            None => 3001,
        };
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let ip: IpAddr = host
            .trim()
            .parse()
            .with_context(|| format!("Invalid HOST: {:?}", host))?;

        let cache_ttl = match lookup("CACHE_TTL") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(
                        "Ignoring invalid CACHE_TTL {:?}, using {}s",
                        raw,
                        DEFAULT_PRICE_TTL.as_secs()
                    );
                    DEFAULT_PRICE_TTL
                }
            },
            None => DEFAULT_PRICE_TTL,
        };

        let environment = lookup("APP_ENV")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_else(|| "development".into());

        let cors_allow = lookup("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = lookup("REQUEST_TIMEOUT_MS")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(30000);

        Ok(Self {
            listen_addr: SocketAddr::new(ip, port),
            cache_ttl,
            metal_price_api_key: non_blank(lookup("METAL_PRICE_API_KEY")),
            news_api_key: non_blank(lookup("NEWS_API_KEY")),
            serve_static: environment.trim().eq_ignore_ascii_case("production"),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "dist".into()),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

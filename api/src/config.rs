use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Sustained registration rate per client IP
    pub register_rate_per_second: u64,
    /// Registration burst size per client IP
    pub register_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            port: parse_or("PORT", 8080),
            register_rate_per_second: parse_or("REGISTER_RATE_PER_SECOND", 2),
            register_burst: parse_or("REGISTER_BURST", 5),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

use std::time::Duration;

/// Runtime configuration. Every flag can also be supplied through its
/// environment variable.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "backend", about = "bandhub HTTP backend")]
pub struct Config {
    /// Socket address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8888")]
    pub bind: String,
    /// PostgreSQL connection URL.
    #[arg(long, env = "DB_URL")]
    pub database: String,
    /// HMAC key for signing bearer tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub secret: String,
    /// Session token lifetime in seconds.
    #[arg(long, env = "SESSION_TTL", default_value_t = bh_core::SESSION_TTL.as_secs())]
    pub session_ttl: u64,
    /// Action token lifetime in seconds.
    #[arg(long, env = "ACTION_TTL", default_value_t = bh_core::ACTION_TTL.as_secs())]
    pub action_ttl: u64,
    /// HTTP worker threads.
    #[arg(long, env = "WORKERS", default_value_t = 4)]
    pub workers: usize,
}

impl Config {
    pub fn session(&self) -> Duration {
        Duration::from_secs(self.session_ttl)
    }
    pub fn action(&self) -> Duration {
        Duration::from_secs(self.action_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_apply() {
        let config = Config::try_parse_from([
            "backend",
            "--database",
            "postgres://localhost/bandhub",
            "--secret",
            "s3cret",
        ])
        .expect("parse");
        assert_eq!(config.bind, "0.0.0.0:8888");
        assert_eq!(config.session(), bh_core::SESSION_TTL);
        assert_eq!(config.action(), bh_core::ACTION_TTL);
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn lifetimes_override() {
        let config = Config::try_parse_from([
            "backend",
            "--database",
            "postgres://localhost/bandhub",
            "--secret",
            "s3cret",
            "--session-ttl",
            "60",
            "--action-ttl",
            "5",
        ])
        .expect("parse");
        assert_eq!(config.session(), Duration::from_secs(60));
        assert_eq!(config.action(), Duration::from_secs(5));
    }
}

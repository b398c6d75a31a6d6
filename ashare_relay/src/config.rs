//! Runtime configuration, from flags or the environment.

use std::net::SocketAddr;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ashare-relay")]
#[command(about = "Stateless HTTP relay serving A-share market data as JSON")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:5000", env = "ASHARE_BIND")]
    pub bind: SocketAddr,

    /// Send every upstream request to this base URL instead of the real
    /// provider hosts. Meant for integration tests and local replay.
    #[arg(long, env = "ASHARE_UPSTREAM_BASE")]
    pub upstream_base: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_to_the_service_port() {
        let config = Config::parse_from(["ashare-relay"]);
        assert_eq!(config.bind.port(), 5000);
        assert!(config.upstream_base.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::parse_from([
            "ashare-relay",
            "--bind",
            "127.0.0.1:8080",
            "--upstream-base",
            "http://localhost:9000",
        ]);
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.upstream_base.as_deref(), Some("http://localhost:9000"));
    }
}

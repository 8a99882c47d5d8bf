use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "lmchat-console")]
#[command(about = "chat console backend for a local lm studio completion service")]
pub struct Config {
    #[arg(long, default_value = "127.0.0.1:8080", help = "server listen address")]
    pub listen: String,

    #[arg(
        long,
        env = "LMCHAT_API_URL",
        default_value = "http://localhost:5000",
        help = "completion service base url"
    )]
    pub api_url: String,

    #[arg(
        long,
        default_value = "info",
        help = "log level (off, error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    #[arg(
        long,
        default_value = "2m",
        help = "timeout for each request to the completion service (e.g. 30s, 2m)"
    )]
    pub request_timeout: String,

    #[arg(
        long,
        help = "reject default parameter payloads that carry unknown keys"
    )]
    pub strict_defaults: bool,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        humantime::parse_duration(&self.request_timeout).unwrap_or(Duration::from_secs(120))
    }

    /// Base URL without a trailing slash so endpoint paths can be appended directly.
    pub fn api_base(&self) -> String {
        self.api_url.trim_end_matches('/').to_string()
    }
}

pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.listen.parse::<std::net::SocketAddr>().is_err() {
        return Err(format!("invalid listen address: {}", config.listen));
    }
    if !config.api_url.starts_with("http://") && !config.api_url.starts_with("https://") {
        return Err(format!(
            "invalid completion service URL (must start with http:// or https://): {}",
            config.api_url
        ));
    }
    if let Err(e) = url::Url::parse(&config.api_url) {
        return Err(format!("invalid completion service URL format: {}", e));
    }
    match humantime::parse_duration(&config.request_timeout) {
        Ok(d) if d.is_zero() => {
            return Err("request timeout must be greater than zero".to_string());
        }
        Ok(_) => {}
        Err(e) => {
            return Err(format!(
                "invalid request timeout '{}': {}",
                config.request_timeout, e
            ));
        }
    }
    Ok(())
}

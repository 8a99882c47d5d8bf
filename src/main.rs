use clap::Parser;

mod backend;
mod config;
mod constants;
mod error;
mod handlers;
mod health;
mod http;
mod logging;
mod orchestrator;
mod params;
mod server;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::parse();

    config::validate_config(&cfg)?;

    logging::setup_logging(&cfg.log_level)?;

    let debug_enabled =
        cfg.log_level.eq_ignore_ascii_case("debug") || cfg.log_level.eq_ignore_ascii_case("trace");
    logging::LogConfig::init(debug_enabled);

    let server = server::ConsoleServer::new(cfg)?;
    server.run().await
}

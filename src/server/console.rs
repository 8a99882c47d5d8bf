use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use warp::Filter;

use crate::backend::HttpBackend;
use crate::config::Config;
use crate::constants::{LOG_PREFIX_WARNING, SHUTDOWN_GRACE_SECS};
use crate::logging::LogConfig;
use crate::orchestrator::Orchestrator;
use crate::server::handle_rejection;
use crate::server::routes::create_routes;

pub struct ConsoleServer {
    pub config: Config,
    pub orchestrator: Arc<Orchestrator<HttpBackend>>,
    shutdown: CancellationToken,
}

impl ConsoleServer {
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let shutdown = CancellationToken::new();
        let backend = HttpBackend::new(
            &config.api_base(),
            config.request_timeout(),
            shutdown.child_token(),
        )?;
        log::info!(
            "completion service: {} (timeout {})",
            backend.base_url(),
            config.request_timeout
        );
        let orchestrator = Arc::new(Orchestrator::new(backend, config.strict_defaults));

        Ok(Self {
            config,
            orchestrator,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr: SocketAddr = self.config.listen.parse()?;

        let routes = create_routes(self.orchestrator.clone()).recover(handle_rejection);

        let cors = warp::cors()
            .allow_any_origin()
            .allow_headers(vec!["Content-Type", "Authorization", "Accept", "Origin"])
            .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]);

        let routes_with_cors = routes.with(cors);

        if LogConfig::get().debug_enabled {
            log::info!("starting chat console on {} (debug mode)", addr);
        } else {
            log::info!("starting chat console on {}", addr);
        }
        // the badge starts as "checking" and settles once this probe returns
        let probe_target = self.orchestrator.clone();
        tokio::spawn(async move {
            probe_target.start().await;
        });

        tokio::select! {
            _ = warp::serve(routes_with_cors).run(addr) => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("shutdown requested, cancelling in-flight requests");
                self.shutdown.cancel();
                let grace = Duration::from_secs(SHUTDOWN_GRACE_SECS);
                if tokio::time::timeout(grace, self.orchestrator.wait_idle())
                    .await
                    .is_err()
                {
                    log::warn!(
                        "{} submission still pending after {}s, exiting anyway",
                        LOG_PREFIX_WARNING,
                        SHUTDOWN_GRACE_SECS
                    );
                }
            }
        }

        Ok(())
    }
}

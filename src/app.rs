use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::openai::OpenAiClient;
use crate::pipeline::ScheduleReader;
use crate::state::AppState;
use crate::utils::fmt_duration;
use crate::web::create_router;
use anyhow::Context;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// Main application struct containing all necessary components
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Build the fetcher, model client and shared state from `config`.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let fetcher =
            HttpFetcher::new(config.fetch_timeout).context("Failed to create page fetcher")?;
        let model = OpenAiClient::new(
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.max_tokens,
        )
        .with_base_url(config.openai_base_url.clone());

        info!(
            model = model.model(),
            max_tokens = config.max_tokens,
            fetch_timeout = fmt_duration(config.fetch_timeout),
            "pipeline configured"
        );

        let reader = ScheduleReader::new(Arc::new(fetcher), Arc::new(model));
        let app_state = AppState::new(reader, config.access_password.as_str());

        Ok(App { config, app_state })
    }

    /// Serve until SIGINT/SIGTERM, then drain in-flight requests for at most
    /// `SHUTDOWN_TIMEOUT`.
    pub async fn run(self) -> ExitCode {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!(error = %e, %addr, "Failed to bind listener");
                return ExitCode::FAILURE;
            }
        };
        info!(%addr, "web server listening");

        let eviction = self
            .app_state
            .spawn_session_eviction(self.config.session_ttl);
        let router = create_router(self.app_state);

        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_signal().await;
                    let _ = signalled_tx.send(());
                })
                .await
        });

        let exit = tokio::select! {
            result = &mut server => {
                // Server stopped without a shutdown signal.
                report_server_exit(result)
            }
            Ok(()) = signalled_rx => {
                let timeout = self.config.shutdown_timeout;
                info!(timeout = fmt_duration(timeout), "shutdown signal received, draining connections");
                match tokio::time::timeout(timeout, &mut server).await {
                    Ok(result) => report_server_exit(result),
                    Err(_) => {
                        warn!(timeout = fmt_duration(timeout), "graceful shutdown timed out");
                        server.abort();
                        ExitCode::FAILURE
                    }
                }
            }
        };

        eviction.abort();
        exit
    }
}

fn report_server_exit(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> ExitCode {
    match result {
        Ok(Ok(())) => {
            info!("web server stopped");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!(error = %e, "web server failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "web server task panicked");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

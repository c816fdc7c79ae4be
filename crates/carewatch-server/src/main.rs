use std::sync::Arc;

use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use carewatch_dispatch::channels::{Channels, Mailer};
use carewatch_dispatch::dispatcher::Dispatcher;
use carewatch_dispatch::email::ReportRenderer;
use carewatch_dispatch::http::{HttpAlerter, HttpNotifier};
use carewatch_dispatch::smtp::{SmtpMailer, UnconfiguredMailer};
use carewatch_dispatch::table::DecisionTable;
use carewatch_intake::Intake;
use carewatch_scoring::RiskScorer;
use carewatch_scoring::engine::RiskEngine;
use carewatch_scoring::local::LocalScorer;
use carewatch_scoring::policy::ScoringPolicy;
use carewatch_scoring::remote::RemoteScorer;
use carewatch_storage::memory::MemoryRepository;
use carewatch_storage::repository::AssessmentRepository;
use carewatch_storage::s3::S3Repository;

mod app;
mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::{ServiceConfig, StoreKind};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ServiceConfig::from_env()?;

    let policy = match &config.scoring_policy {
        Some(path) => ScoringPolicy::load(path)
            .wrap_err_with(|| format!("loading scoring policy {}", path.display()))?,
        None => ScoringPolicy::default(),
    };
    let engine = Arc::new(RiskEngine::new(policy));

    let scorer: Arc<dyn RiskScorer> = match &config.scoring_url {
        Some(url) => Arc::new(RemoteScorer::new(url, config.http_timeout)?),
        None => Arc::new(LocalScorer::new(engine.clone())),
    };

    let repository: Arc<dyn AssessmentRepository> = match config.store {
        StoreKind::Memory => Arc::new(MemoryRepository::new()),
        StoreKind::S3 => {
            let s3 = carewatch_storage::client::build_client().await;
            Arc::new(S3Repository::new(s3, config.bucket.clone()))
        }
    };

    let dispatcher = Arc::new(build_dispatcher(&config)?);

    tracing::info!(
        scorer = scorer.name(),
        store = ?config.store,
        email = config.smtp.is_some(),
        "carewatch starting"
    );

    let state = AppState {
        intake: Arc::new(Intake::new(scorer, repository, dispatcher.clone())),
        engine,
    };
    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .wrap_err_with(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "listening");
    app::serve(listener, app, dispatcher, shutdown_signal()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn build_dispatcher(config: &ServiceConfig) -> eyre::Result<Dispatcher> {
    let client = carewatch_dispatch::http::build_client(config.http_timeout)?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(settings) => Arc::new(SmtpMailer::new(settings)?),
        None => {
            tracing::warn!("SMTP settings incomplete; emails will not be sent");
            Arc::new(UnconfiguredMailer)
        }
    };

    let channels = Channels {
        notifier: Arc::new(HttpNotifier::new(client.clone(), &config.notification_url)),
        alerter: Arc::new(HttpAlerter::new(client, &config.alert_url)),
        mailer,
    };
    let renderer = ReportRenderer::new(&config.report_url)?;

    Ok(Dispatcher::new(DecisionTable::default(), channels, renderer))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

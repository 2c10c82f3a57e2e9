use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use talent_ai::config::AppConfig;
use talent_ai::error::AppError;
use talent_ai::telemetry;
use talent_ai::workflows::automation::{InMemoryRuleRepository, RuleEngine};
use talent_ai::workflows::shortlist::{ScoreExport, ShortlistGenerator};
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDispatcher};
use crate::routes::build_router;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let scores = match args.scores_csv.take() {
        Some(path) => {
            let export = ScoreExport::from_path(&path)?;
            info!(path = %path.display(), candidates = export.len(), "score export loaded");
            export
        }
        None => ScoreExport::default(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let dispatcher = Arc::new(InMemoryDispatcher::default());
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        dispatcher: dispatcher.clone(),
    };

    let engine = Arc::new(RuleEngine::new(Arc::new(InMemoryRuleRepository::default())));
    let generator = Arc::new(ShortlistGenerator::with_defaults(
        Arc::new(scores),
        config.shortlist,
    ));

    let app = build_router(engine, dispatcher, generator)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talent automation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

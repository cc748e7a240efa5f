use crate::cli::ServeArgs;
use crate::infra::{AppState, FileSnapshotStore, InMemorySnapshotStore};
use crate::routes::with_roster_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mentor_map::config::AppConfig;
use mentor_map::error::AppError;
use mentor_map::matching::{
    MentorMapService, MentorMapServiceError, SnapshotError, SnapshotStore,
};
use mentor_map::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dir) = args.snapshot_dir.take() {
        config.matching.snapshot_dir = Some(dir);
    }

    telemetry::init(&config.telemetry)?;

    match config.matching.snapshot_dir.clone() {
        Some(dir) => {
            let store = FileSnapshotStore::open(&dir, config.matching.snapshot_history)?;
            info!(dir = %dir.display(), "persisting snapshots to disk");
            serve(config, store).await
        }
        None => {
            let store = InMemorySnapshotStore::with_retention(config.matching.snapshot_history);
            info!("snapshots kept in memory only");
            serve(config, store).await
        }
    }
}

async fn serve<S>(config: AppConfig, store: S) -> Result<(), AppError>
where
    S: SnapshotStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(MentorMapService::new(
        Arc::new(store),
        config.matching.service_settings(),
    ));
    match service.restore_snapshot(None) {
        Ok(roster) => info!(
            mentors = roster.mentors.len(),
            scholars = roster.scholars.len(),
            "restored latest roster snapshot"
        ),
        Err(MentorMapServiceError::Snapshot(SnapshotError::NotFound)) => {
            info!("no stored snapshot; starting with an empty roster")
        }
        Err(err) => warn!(%err, "snapshot restore failed; starting with an empty roster"),
    }

    let app = with_roster_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mentor map service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

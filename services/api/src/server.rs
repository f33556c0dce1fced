use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use oncall_network::config::AppConfig;
use oncall_network::error::AppError;
use oncall_network::leads::{AirtableClient, LeadIntakeService};
use oncall_network::telemetry;
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if !config.record_store.has_credentials() {
        warn!("record store credentials unset; submissions will fail until configured");
    }

    let record_store = Arc::new(AirtableClient::new(config.record_store.clone())?);
    let intake_service = Arc::new(LeadIntakeService::new(record_store));

    let app = with_lead_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use eta_server::catalog::StationCatalog;
use eta_server::config::ServerConfig;
use eta_server::schedule::{MockScheduleClient, ScheduleBackend, ScheduleClient};
use eta_server::web::{AppState, cors_layer, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let catalog = StationCatalog::load(&config.catalog_path)?;
    tracing::info!(
        path = %config.catalog_path.display(),
        rows = catalog.len(),
        stations = catalog.station_count(),
        "loaded station catalog"
    );

    let backend = match &config.mock_schedules {
        Some(dir) => {
            let mock = MockScheduleClient::new(dir)?;
            tracing::warn!(
                dir = %dir.display(),
                pairs = mock.available().await.len(),
                "serving mock schedules"
            );
            ScheduleBackend::Mock(mock)
        }
        None => ScheduleBackend::Live(ScheduleClient::new(config.schedule_config())?),
    };

    let state = AppState::new(catalog, backend, config.line_policy());
    let app = create_router(state, cors_layer(&config.cors_origins));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "MTR arrival service listening");

    axum::serve(listener, app).await?;
    Ok(())
}

use route_server::config::AppConfig;
use route_server::planner::RoutePlanner;
use route_server::sources::fixture::FixtureSources;
use route_server::sources::otp::OtpClient;
use route_server::sources::publibike::PubliBikeClient;
use route_server::sources::sharedmobility::SharedMobilityClient;
use route_server::sources::{StationFeed, TransitPlanner, VehicleFeed};
use route_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();

    match config.fixture_dir.clone() {
        Some(dir) => {
            let sources = FixtureSources::load(&dir).expect("Failed to load fixtures");
            let planner = RoutePlanner::new(
                sources.clone(),
                sources.clone(),
                sources,
                config.planner.clone(),
            );
            serve(&config, planner).await;
        }
        None => {
            let otp = OtpClient::new(config.otp.clone()).expect("Failed to create OTP client");
            let publibike = PubliBikeClient::new(config.publibike.clone())
                .expect("Failed to create PubliBike client");
            let sharedmobility = SharedMobilityClient::new(config.sharedmobility.clone())
                .expect("Failed to create sharedmobility.ch client");
            let planner = RoutePlanner::new(otp, publibike, sharedmobility, config.planner.clone());
            serve(&config, planner).await;
        }
    }
}

async fn serve<T, S, V>(config: &AppConfig, planner: RoutePlanner<T, S, V>)
where
    T: TransitPlanner + 'static,
    S: StationFeed + 'static,
    V: VehicleFeed + 'static,
{
    let app = create_router(AppState::new(planner));

    info!(addr = %config.bind_addr, fixtures = config.fixture_dir.is_some(), "Route planner listening");
    info!("  GET  /health      - Health check");
    info!("  GET  /api/modes   - Supported modes");
    info!("  POST /api/routes  - Plan routes");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}

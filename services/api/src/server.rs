use crate::cli::ServeArgs;
use crate::infra::{build_wardrobe_service, AppState, InMemoryWardrobeRepository};
use crate::routes::with_wardrobe_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use outfit_ai::config::AppConfig;
use outfit_ai::error::AppError;
use outfit_ai::telemetry;
use outfit_ai::workflows::wardrobe::{UserId, WardrobeImporter};
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

    if config.judge.api_key.is_none() {
        warn!("JUDGE_API_KEY is not set; outfits will be ranked by rule score only");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryWardrobeRepository::default());
    let wardrobe_service = build_wardrobe_service(repository, &config.judge)?;

    if let Some(path) = args.wardrobe.take() {
        let garments = WardrobeImporter::from_path(&path)?;
        wardrobe_service.import(&UserId::new(args.user.clone()), garments)?;
    }

    let app = with_wardrobe_routes(wardrobe_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, judge_model = %config.judge.model, "outfit service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

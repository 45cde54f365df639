use axum::{middleware, routing::get, Router};
use domain::services::{ApplicationStore, HierarchyAggregator, OfficeDirectory, RosterTable};
use shared::jwt::{JwtConfig, JwtError};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{health, monitor, office, officials};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub applications: Arc<dyn ApplicationStore>,
    pub directory: Arc<dyn OfficeDirectory>,
    pub aggregator: HierarchyAggregator,
}

impl AppState {
    pub fn new(
        config: Config,
        applications: Arc<dyn ApplicationStore>,
        directory: Arc<dyn OfficeDirectory>,
        rosters: RosterTable,
    ) -> Result<Self, JwtError> {
        let jwt = JwtConfig::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;
        let aggregator =
            HierarchyAggregator::new(applications.clone(), directory.clone(), Arc::new(rosters));

        Ok(Self {
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            applications,
            directory,
            aggregator,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Official routes authenticate through the OfficialAuth extractor.
    let official_routes = Router::new()
        .route("/api/monitor/hierarchy-stats", get(monitor::get_hierarchy_stats))
        .route("/api/office/stats", get(office::get_office_stats))
        .route("/api/office/applications", get(office::get_office_applications))
        .route("/api/officials", get(officials::list_officials));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(official_routes)
        .fallback(not_found)
        // Global middleware (bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}

//! Common test utilities for integration tests.
//!
//! Every test gets its own in-memory store, so no database is needed.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use domain::{
    models::{ApplicationRecord, OfficeAccount},
    services::InMemoryStore,
};
use office_monitor_api::{
    app::{create_app, AppState},
    config::{
        Config, DatabaseConfig, HierarchyConfig, JwtAuthConfig, LoggingConfig, SecurityConfig,
        ServerConfig,
    },
};
use std::sync::Arc;
use uuid::Uuid;

/// Test configuration with fixed rosters disabled.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: "postgres://unused@localhost/unused".to_string(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        jwt: JwtAuthConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_secs: 3600,
            leeway_secs: 30,
        },
        hierarchy: HierarchyConfig {
            roster_path: String::new(),
        },
    }
}

/// Test configuration pointing at the rosters shipped in `config/`.
pub fn test_config_with_bundled_rosters() -> Config {
    let mut config = test_config();
    config.hierarchy.roster_path =
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/rosters.toml").to_string();
    config
}

/// A running app plus handles onto its store and token issuer.
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// Mint a bearer token whose subject is the given official.
    pub fn token_for(&self, official: &OfficeAccount) -> String {
        self.token_for_id(official.id)
    }

    pub fn token_for_id(&self, id: Uuid) -> String {
        let (token, _jti) = self
            .state
            .jwt
            .issue_token(id)
            .expect("Failed to issue test token");
        token
    }
}

/// Build an app over a store seeded with the given officials and records.
pub fn create_test_app(
    config: Config,
    officials: Vec<OfficeAccount>,
    applications: Vec<ApplicationRecord>,
) -> TestApp {
    let rosters = config
        .hierarchy
        .load_rosters()
        .expect("Failed to load test rosters");
    let store = Arc::new(InMemoryStore::with_data(officials, applications));
    let state = AppState::new(config, store.clone(), store.clone(), rosters)
        .expect("Failed to build app state");

    TestApp {
        app: create_app(state.clone()),
        state,
        store,
    }
}

/// Build a GET request without authentication.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a GET request with a bearer token.
pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Parse response body as JSON.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Read the response body as text.
pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).into_owned()
}

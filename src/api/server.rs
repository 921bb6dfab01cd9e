use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api::users;
use crate::config::Config;
use crate::db::repo::{self, Repository};

#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
}

pub fn app(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/users", post(users::create_user).get(users::list_users))
        .route("/api/users/", post(users::create_user).get(users::list_users))
        .route("/api/users/{id}/exercises", post(users::add_exercise))
        .route("/api/users/{id}/logs", get(users::get_log))
        .route_service("/", ServeFile::new(&config.index_file))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let pool = repo::connect(&config.database_url)
        .await
        .with_context(|| format!("connect to {}", config.database_location()))?;

    repo::create_schema(&pool)
        .await
        .context("create schema")?;

    let state = Arc::new(AppState {
        repo: Repository::new(pool),
    });

    let app = app(state, &config);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind to {addr}"))?;

    tracing::info!("Your app is listening on port {}", listener.local_addr()?.port());

    axum::serve(listener, app).await.context("server failed")?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_app() -> Router {
    let state = Arc::new(AppState {
        repo: repo::test_repository().await,
    });
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        host: std::net::Ipv4Addr::LOCALHOST.into(),
        port: 0,
        static_dir: "public".into(),
        index_file: "views/index.html".into(),
    };
    app(state, &config)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;

    async fn fetch(uri: &str) -> (StatusCode, String) {
        let app = test_app().await;
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = fetch("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_landing_page() {
        let (status, body) = fetch("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Exercise tracker"));
    }

    #[tokio::test]
    async fn test_static_assets() {
        let (status, body) = fetch("/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("font-family"));

        let (status, _) = fetch("/missing.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let app = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/users")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}

mod config;
mod error;
mod graphql;
mod model;
mod players;
mod prediction;
mod rest;
mod state;
mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::http::HeaderValue;
use axum::{
    extract::State,
    middleware,
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use config::Config;
use graphql::Schema;
use state::Services;

async fn graphql_handler(State(schema): State<Schema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

/// Build a cache-controlled static file router.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(services: Arc<Services>, static_dir: &Path, dist_dir: &Path) -> Router {
    let schema = graphql::build_schema(services.clone());

    let static_files = Router::new()
        .nest("/static", cached_static_router(static_dir, CACHE_1DAY))
        .nest("/dist", cached_static_router(dist_dir, CACHE_IMMUTABLE))
        .nest(
            "/assets",
            cached_static_router(&dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    let api = Router::new()
        .route("/api", get(rest::service_info))
        .route("/health", get(rest::health))
        .route("/predict", post(rest::predict))
        .route("/players", get(rest::players))
        .route("/analytics", get(rest::analytics))
        .route("/cache/clear", post(rest::clear_cache))
        .with_state(services.clone());

    let graphql = Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(schema);

    let index = Router::new()
        .route("/", get(serve_index))
        .with_state(dist_dir.to_path_buf());

    Router::new()
        .merge(api)
        .merge(graphql)
        .merge(index)
        .merge(static_files)
        .layer(middleware::from_fn_with_state(services, rest::request_context))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

/// Wire the services together from configuration.
fn build_services(config: &Config) -> Result<Arc<Services>, String> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    let storage = storage::Storage::open(&config.db_path)?;

    let model = match model::ShotModel::load(&config.model_path) {
        Ok(m) => Some(m),
        Err(e) => {
            tracing::error!(error = %e, "shot model unavailable, predictions will fail");
            None
        }
    };

    let players = Arc::new(players::PlayerService::load(&config.assets_dir));
    let prediction = prediction::PredictionService::new(
        model,
        players.clone(),
        storage,
        config.cache_capacity,
        config.prediction_timeout,
    );
    Ok(Arc::new(Services::new(prediction, players)))
}

#[tokio::main]
async fn main() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env();
    tracing::debug!(?config, "configuration loaded");

    let services = match build_services(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            std::process::exit(1);
        }
    };
    services.prediction.warm_up().await;

    let app = build_app(services, &config.static_dir, &config.dist_dir);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(port = config.port, "Server running at http://localhost:{}", config.port);
    tracing::info!("GraphiQL playground at http://localhost:{}/graphql", config.port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server exited");
    }
}

async fn serve_index(State(dist_dir): State<PathBuf>) -> Html<String> {
    // Serve the built frontend when present.
    match tokio::fs::read_to_string(dist_dir.join("index.html")).await {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html>
<head><title>Courtside</title></head>
<body>
<h1>Courtside Shot Predictor</h1>
<p>Frontend not built yet. Visit <a href="/graphql">GraphiQL</a> to explore the API.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::state::tests::test_services;

    /// Create a temp dir with a test file and return the dir path.
    fn temp_dir_with_file(file_name: &str, content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(file_name), content).unwrap();
        dir
    }

    struct TestApp {
        app: Router,
        _static: tempfile::TempDir,
        _dist: tempfile::TempDir,
        _db: tempfile::TempDir,
    }

    fn test_app(with_model: bool) -> TestApp {
        let static_dir = temp_dir_with_file("court.svg", "<svg/>");
        let dist = temp_dir_with_file("index.html", "<html>courtside</html>");
        std::fs::create_dir(dist.path().join("assets")).unwrap();
        std::fs::write(dist.path().join("assets/app-1a2b.js"), "main()").unwrap();
        let (db, services) = test_services(with_model);
        TestApp {
            app: build_app(services, static_dir.path(), dist.path()),
            _static: static_dir,
            _dist: dist,
            _db: db,
        }
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_static_assets_have_1day_cache() {
        let t = test_app(true);
        let resp = t.app.oneshot(get("/static/court.svg")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=86400, must-revalidate"
        );
    }

    #[tokio::test]
    async fn test_dist_assets_have_immutable_cache() {
        let t = test_app(true);
        let resp = t.app.oneshot(get("/assets/app-1a2b.js")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("cache-control").unwrap(),
            "public, max-age=31536000, immutable"
        );
    }

    #[tokio::test]
    async fn test_model_and_roster_are_not_published() {
        let t = test_app(true);
        for uri in ["/static/model.json", "/static/players.json"] {
            let resp = t.app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_missing_static_file_returns_404() {
        let t = test_app(true);
        let resp = t.app.oneshot(get("/static/nonexistent.txt")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_serves_built_frontend() {
        let t = test_app(true);
        let resp = t.app.oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<html>courtside</html>");
    }

    #[tokio::test]
    async fn test_predict_returns_probability() {
        let t = test_app(true);
        let resp = t
            .app
            .oneshot(post_json(
                "/predict",
                serde_json::json!({
                    "LOC_X": -120, "LOC_Y": 85, "SHOT_DISTANCE": 14.7,
                    "SHOT_TYPE": 2, "SHOT_ZONE_BASIC": "Mid-Range",
                    "PLAYER_NAME": "Stephen Curry"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        assert!(resp.headers().contains_key("x-process-time"));
        let body = json_body(resp).await;
        let p = body["probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(body["shot_info"]["shot_type"], "2-Pointer");
    }

    #[tokio::test]
    async fn test_predict_out_of_range_is_422_with_request_id() {
        let t = test_app(true);
        let resp = t
            .app
            .oneshot(post_json(
                "/predict",
                serde_json::json!({
                    "LOC_X": 999, "LOC_Y": 85, "SHOT_DISTANCE": 14.7,
                    "SHOT_TYPE": "2PT Field Goal", "SHOT_ZONE_BASIC": "Mid-Range",
                    "PLAYER_NAME": "Stephen Curry"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let header_id = resp
            .headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = json_body(resp).await;
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(body["statusCode"], 422);
        assert_eq!(body["requestId"], header_id.as_str());
    }

    #[tokio::test]
    async fn test_predict_malformed_payload_is_422() {
        let t = test_app(true);
        let resp = t
            .app
            .oneshot(post_json(
                "/predict",
                serde_json::json!({ "LOC_X": 0, "SHOT_TYPE": 5 }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(resp).await;
        assert_eq!(body["error"], "ValidationError");
    }

    #[tokio::test]
    async fn test_predict_without_model_is_503() {
        let t = test_app(false);
        let resp = t
            .app
            .oneshot(post_json(
                "/predict",
                serde_json::json!({
                    "LOC_X": 0, "LOC_Y": 100, "SHOT_DISTANCE": 10,
                    "SHOT_TYPE": 2, "SHOT_ZONE_BASIC": "Mid-Range",
                    "PLAYER_NAME": "LeBron James"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(resp).await["error"], "ModelError");
    }

    #[tokio::test]
    async fn test_players_pagination_and_search() {
        let t = test_app(true);
        let resp = t
            .app
            .clone()
            .oneshot(get("/players?page=2&per_page=10"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["total"], 12);
        assert_eq!(body["players"].as_array().unwrap().len(), 2);

        let resp = t.app.oneshot(get("/players?search=james")).await.unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["players"][0]["name"], "LeBron James");
    }

    #[tokio::test]
    async fn test_players_rejects_oversized_page() {
        let t = test_app(true);
        let resp = t.app.oneshot(get("/players?per_page=101")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let t = test_app(true);
        let resp = t.app.clone().oneshot(get("/health")).await.unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model_loaded"], true);

        let resp = t.app.oneshot(get("/api")).await.unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["players"], 12);
    }

    #[tokio::test]
    async fn test_analytics_counts_requests_and_predictions() {
        let t = test_app(true);
        let shot = serde_json::json!({
            "LOC_X": 0, "LOC_Y": 225, "SHOT_DISTANCE": 22.5,
            "SHOT_TYPE": 2, "SHOT_ZONE_BASIC": "Mid-Range",
            "PLAYER_NAME": "Jayson Tatum"
        });
        for _ in 0..2 {
            let resp = t.app.clone().oneshot(post_json("/predict", shot.clone())).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = t.app.clone().oneshot(get("/analytics")).await.unwrap();
        let body = json_body(resp).await;
        assert_eq!(body["predictions"]["total_predictions"], 2);
        assert_eq!(body["predictions"]["predictions_by_player"]["Jayson Tatum"], 2);
        assert_eq!(body["cache"]["cache_hits"], 1);
        assert_eq!(body["system"]["successful_requests"], 2);

        let resp = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cache/clear")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_graphql_endpoint_serves_players() {
        let t = test_app(true);
        let resp = t
            .app
            .oneshot(post_json(
                "/graphql",
                serde_json::json!({ "query": "{ players { total } }" }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["data"]["players"]["total"], 12);
    }
}

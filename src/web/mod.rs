// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::config::{EnvironmentConfig, ScrapeConfig};
use crate::recommendation::{CvAnalyzer, FsCvStore, RecommendationService};
use crate::scrape::HttpFetcher;
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, options, routes, Request, Response, State};
use std::sync::Arc;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[get("/recommendations/<user_id>")]
pub async fn get_recommendations(
    user_id: &str,
    service: &State<Arc<RecommendationService>>,
) -> Result<Json<RecommendationResponse>, (Status, Json<ErrorResponse>)> {
    handlers::get_recommendations_handler(user_id, service).await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[options("/<_..>")]
pub async fn all_options() {
    // CORS preflight, headers added by the fairing
}

#[catch(404)]
fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND",
        vec!["Check the request path".to_string()],
    ))
}

#[catch(500)]
fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR",
        vec!["Try again in a few moments".to_string()],
    ))
}

pub async fn start_web_server(environment: EnvironmentConfig, port: u16) -> Result<()> {
    let scrape_config = ScrapeConfig::default();

    let store = Arc::new(FsCvStore::new(environment.data_dir.clone()));
    let analyzer = Arc::new(CvAnalyzer::new().context("Failed to initialize CV analyzer")?);
    let fetcher =
        Arc::new(HttpFetcher::new(&scrape_config).context("Failed to initialize job fetcher")?);

    let service = Arc::new(RecommendationService::new(
        scrape_config,
        store,
        analyzer,
        fetcher,
    ));

    info!("Starting job recommendation server on port {}", port);

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(service)
        .mount("/api", routes![get_recommendations, health, all_options])
        .register("/", catchers![not_found, internal_error])
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server error: {}", e))?;

    Ok(())
}

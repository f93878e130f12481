// src/web/handlers.rs
use crate::recommendation::{RecommendationError, RecommendationService};
use crate::web::types::{ErrorResponse, RecommendationResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;
use tracing::{error, warn};

pub async fn get_recommendations_handler(
    user_id: &str,
    service: &State<Arc<RecommendationService>>,
) -> Result<Json<RecommendationResponse>, (Status, Json<ErrorResponse>)> {
    match service.get_job_recommendations(user_id).await {
        Ok(recommendations) => Ok(Json(RecommendationResponse::from(recommendations))),
        Err(err @ RecommendationError::CvNotFound) => {
            warn!("No CV document for user: {}", user_id);
            Err((
                Status::NotFound,
                Json(ErrorResponse::new(
                    err.to_string(),
                    "CV_NOT_FOUND",
                    vec!["Upload a CV before requesting recommendations".to_string()],
                )),
            ))
        }
        Err(RecommendationError::Internal(e)) => {
            error!("Recommendation request failed for {}: {:#}", user_id, e);
            Err((
                Status::InternalServerError,
                Json(ErrorResponse::new(
                    "Failed to generate job recommendations".to_string(),
                    "RECOMMENDATION_ERROR",
                    vec!["Try again in a few moments".to_string()],
                )),
            ))
        }
    }
}

// src/web/types.rs
use crate::recommendation::{CvAnalysis, JobRecommendations};
use crate::scrape::JobRecord;
use rocket::serde::Serialize;

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub success: bool,
    pub jobs: Vec<JobRecord>,
    pub total_jobs: usize,
    pub analysis: CvAnalysis,
}

impl From<JobRecommendations> for RecommendationResponse {
    fn from(recommendations: JobRecommendations) -> Self {
        Self {
            success: true,
            jobs: recommendations.jobs,
            total_jobs: recommendations.total_jobs,
            analysis: recommendations.analysis,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: String, error_code: &str, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error,
            error_code: error_code.to_string(),
            suggestions,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: "jobscout".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

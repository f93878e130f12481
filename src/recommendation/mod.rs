// src/recommendation/mod.rs
use crate::config::ScrapeConfig;
use crate::scrape::{scrape_jobs, JobRecord, PageFetcher, ScrapeOptions};
use anyhow::Context;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub mod analyzer;
pub mod store;

pub use analyzer::{AnalysisProvider, CvAnalysis, CvAnalyzer};
pub use store::{CvDocument, CvStore, FsCvStore};

/// How many jobs one scrape run targets before ranking.
pub const SCRAPE_TARGET: usize = 25;
/// How many ranked jobs a recommendation response carries.
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Boundary error: the web layer maps `CvNotFound` to 404 and everything
/// else to an opaque 500.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("CV document not found. Upload a CV before requesting recommendations.")]
    CvNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecommendations {
    pub jobs: Vec<JobRecord>,
    pub total_jobs: usize,
    pub analysis: CvAnalysis,
}

/// Per-request orchestration: CV text -> AI skill profile -> scrape -> top-N.
/// All-or-nothing: analysis or pipeline failures surface as a single error,
/// never as partial results.
pub struct RecommendationService {
    scrape_config: ScrapeConfig,
    store: Arc<dyn CvStore>,
    analyzer: Arc<dyn AnalysisProvider>,
    fetcher: Arc<dyn PageFetcher>,
}

impl RecommendationService {
    pub fn new(
        scrape_config: ScrapeConfig,
        store: Arc<dyn CvStore>,
        analyzer: Arc<dyn AnalysisProvider>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            scrape_config,
            store,
            analyzer,
            fetcher,
        }
    }

    pub async fn get_job_recommendations(
        &self,
        user_id: &str,
    ) -> Result<JobRecommendations, RecommendationError> {
        info!("Generating job recommendations for user: {}", user_id);

        let document = self
            .store
            .get_cv_document(user_id)
            .await
            .context("Failed to load CV document")?
            .ok_or(RecommendationError::CvNotFound)?;

        let analysis = self
            .analyzer
            .analyze_cv(&document.content)
            .await
            .context("Failed to analyze CV text")?;

        let keyword = derive_search_keyword(&analysis);
        let experience_level = Some(analysis.experience_level.trim().to_string())
            .filter(|level| !level.is_empty());
        let options = ScrapeOptions::new(
            keyword,
            self.scrape_config.default_location.clone(),
            SCRAPE_TARGET,
        )
        .with_skills(analysis.skills.clone())
        .with_experience_level(experience_level);

        let mut jobs = scrape_jobs(&self.scrape_config, self.fetcher.as_ref(), &options).await;
        jobs.truncate(MAX_RECOMMENDATIONS);

        let total_jobs = jobs.len();
        info!(
            "Returning {} job recommendations for user: {}",
            total_jobs, user_id
        );

        Ok(JobRecommendations {
            jobs,
            total_jobs,
            analysis,
        })
    }
}

/// Search keyword: the analysis keywords, else the first identified role,
/// else empty.
fn derive_search_keyword(analysis: &CvAnalysis) -> String {
    let keywords = analysis.keywords.trim();
    if !keywords.is_empty() {
        return keywords.to_string();
    }
    analysis
        .roles
        .first()
        .map(|role| role.trim().to_string())
        .unwrap_or_default()
}

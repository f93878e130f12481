// src/scrape/mod.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod fetcher;
pub mod parser;
pub mod pipeline;

pub use fetcher::{HttpFetcher, PageFetcher};
pub use pipeline::scrape_jobs;

/// One job listing extracted from a results page. Ephemeral: built per scrape
/// run and returned to the caller, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
    pub is_remote: bool,
    pub job_url: String,
    pub apply_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
    /// Upstream posting id, used for duplicate suppression within one run.
    #[serde(skip_serializing)]
    pub external_id: Option<String>,
    /// Caller-supplied skills found verbatim in title + description.
    #[serde(skip_serializing)]
    pub skills: Vec<String>,
    #[serde(skip_serializing)]
    pub skill_match_count: usize,
}

/// Immutable input to a single pipeline run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub keyword: String,
    pub location: String,
    pub max_jobs: usize,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub skills: Vec<String>,
}

impl ScrapeOptions {
    pub fn new(keyword: impl Into<String>, location: impl Into<String>, max_jobs: usize) -> Self {
        Self {
            keyword: keyword.into(),
            location: location.into(),
            max_jobs,
            experience_level: None,
            job_type: None,
            skills: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_experience_level(mut self, level: Option<String>) -> Self {
        self.experience_level = level;
        self
    }
}

// src/recommendation/analyzer.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info};

/// Structured profile extracted from CV text by the analysis API.
///
/// The JSON contract is enforced by prompt instruction only; a reply that
/// does not deserialize propagates as an error to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CvAnalysis {
    pub roles: Vec<String>,
    pub skills: Vec<String>,
    pub experience_level: String,
    pub keywords: String,
}

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze_cv(&self, cv_text: &str) -> Result<CvAnalysis>;
}

#[derive(Debug, Serialize)]
struct AnalysisRequest {
    context: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    message: String,
}

const ANALYSIS_PROMPT: &str = r#"You are a career advisor analyzing a CV. Reply in JSON only, no prose.
Your JSON deserializes into the following struct:
"""
{
  "roles": ["string"],
  "skills": ["string"],
  "experienceLevel": "string",
  "keywords": "string"
}
"""
- roles: job titles the candidate is qualified for, most relevant first
- skills: concrete technologies and competencies named in the CV
- experienceLevel: one of ["internship", "entry", "associate", "mid-senior", "director", "executive"]
- keywords: a single short search phrase for job boards
DO NOT make up data that is not explicitly present in the CV.

CV:
"""
"#;

/// Client for the CV text-analysis API.
pub struct CvAnalyzer {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CvAnalyzer {
    pub fn new() -> Result<Self> {
        let api_key = env::var("ANALYSIS_API_KEY")
            .context("ANALYSIS_API_KEY environment variable not set")?;

        let base_url =
            env::var("ANALYSIS_API_URL").unwrap_or_else(|_| "https://api0.ai".to_string());

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    async fn send_completion(&self, context: &str, content: &str) -> Result<String> {
        let request = AnalysisRequest {
            context: context.to_string(),
            content: content.to_string(),
        };

        info!("Sending request to analysis API: {}", context);

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to analysis API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Analysis API error {}: {}", status, error_text);
            anyhow::bail!("Analysis API returned error {}: {}", status, error_text);
        }

        let analysis_response: AnalysisResponse = response
            .json()
            .await
            .context("Failed to parse analysis API response")?;

        Ok(analysis_response.message)
    }
}

#[async_trait]
impl AnalysisProvider for CvAnalyzer {
    async fn analyze_cv(&self, cv_text: &str) -> Result<CvAnalysis> {
        let mut prompt = ANALYSIS_PROMPT.to_owned();
        prompt.push_str(cv_text);
        prompt.push_str("\n\"\"\"");

        let reply = self.send_completion("CV Analysis", &prompt).await?;

        let analysis: CvAnalysis = serde_json::from_str(strip_code_fence(&reply))
            .context("Failed to parse CV analysis reply as JSON")?;

        info!(
            "CV analysis extracted {} roles and {} skills",
            analysis.roles.len(),
            analysis.skills.len()
        );
        Ok(analysis)
    }
}

/// Models tend to wrap JSON replies in markdown fences.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

// src/scrape/pipeline.rs
use super::fetcher::PageFetcher;
use super::{parser, JobRecord, ScrapeOptions};
use crate::config::ScrapeConfig;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Url;
use tokio::time::sleep;
use tracing::{info, warn};

/// Run one scrape: loop sequentially over keyword variations and pages,
/// deduplicate, then rank matched-first. Per-page failures are absorbed so a
/// partially reachable upstream still yields results; an empty vec is the
/// worst case.
pub async fn scrape_jobs(
    config: &ScrapeConfig,
    fetcher: &dyn PageFetcher,
    options: &ScrapeOptions,
) -> Vec<JobRecord> {
    let variations = keyword_variations(options);
    info!(
        "Starting scrape for '{}' in {} (target {}, {} keyword variations)",
        options.keyword,
        options.location,
        options.max_jobs,
        variations.len()
    );

    let mut results: Vec<JobRecord> = Vec::new();
    let mut first_fetch = true;

    'variations: for keyword in &variations {
        for page in 0..config.max_pages_per_keyword {
            if results.len() >= options.max_jobs {
                break 'variations;
            }

            if !first_fetch {
                // Deliberate 1 req/s throttle toward the upstream source.
                sleep(config.fetch_delay).await;
            }
            first_fetch = false;

            let url = match build_search_url(config, keyword, page, options) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping page {} for '{}': {}", page, keyword, e);
                    continue;
                }
            };

            let html = match fetcher.fetch_page(&url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Skipping page {} for '{}': {}", page, keyword, e);
                    continue;
                }
            };

            let records = parser::parse_job_cards(&html, &options.skills, Utc::now());
            if records.is_empty() {
                // No more listings for this keyword.
                break;
            }

            for record in records {
                if is_duplicate(&results, &record) {
                    continue;
                }
                results.push(record);
            }
        }
    }

    rank_jobs(&mut results);
    results.truncate(options.max_jobs);

    info!("Scrape finished with {} jobs", results.len());
    results
}

/// The base keyword plus up to two caller skills as supplementary searches.
fn keyword_variations(options: &ScrapeOptions) -> Vec<String> {
    let base = options.keyword.trim().to_string();
    let mut variations = vec![base.clone()];

    for skill in &options.skills {
        if variations.len() >= 3 {
            break;
        }
        let skill = skill.trim();
        if skill.is_empty() || skill.eq_ignore_ascii_case(&base) {
            continue;
        }
        variations.push(skill.to_string());
    }

    variations
}

fn build_search_url(
    config: &ScrapeConfig,
    keyword: &str,
    page: usize,
    options: &ScrapeOptions,
) -> Result<String> {
    let start = page * config.page_size;
    let mut params: Vec<(&str, String)> = vec![
        ("keywords", keyword.to_string()),
        ("location", options.location.clone()),
        ("start", start.to_string()),
    ];

    if let Some(code) = options
        .experience_level
        .as_deref()
        .and_then(experience_code)
    {
        params.push(("f_E", code.to_string()));
    }
    if let Some(code) = options.job_type.as_deref().and_then(job_type_code) {
        params.push(("f_JT", code.to_string()));
    }

    let url = Url::parse_with_params(&config.base_url, &params)
        .context("Failed to build search URL")?;
    Ok(url.to_string())
}

fn experience_code(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "internship" => Some("1"),
        "entry" | "entry-level" => Some("2"),
        "associate" => Some("3"),
        "mid" | "mid-senior" => Some("4"),
        "director" => Some("5"),
        "executive" => Some("6"),
        _ => None,
    }
}

fn job_type_code(job_type: &str) -> Option<&'static str> {
    match job_type.to_lowercase().as_str() {
        "full-time" | "fulltime" => Some("F"),
        "part-time" | "parttime" => Some("P"),
        "contract" => Some("C"),
        "temporary" => Some("T"),
        "internship" => Some("I"),
        _ => None,
    }
}

/// Duplicate suppression is keyed on non-empty external ids only. Records
/// without an id are never deduplicated against each other; there is nothing
/// reliable to key them on.
fn is_duplicate(existing: &[JobRecord], candidate: &JobRecord) -> bool {
    match candidate.external_id.as_deref() {
        Some(id) if !id.is_empty() => existing
            .iter()
            .any(|job| job.external_id.as_deref() == Some(id)),
        _ => false,
    }
}

/// Attach skill match counts, then order matched records (descending by
/// count, stable) ahead of unmatched ones. Callers always get some results
/// even with zero skill overlap.
pub fn rank_jobs(jobs: &mut Vec<JobRecord>) {
    for job in jobs.iter_mut() {
        job.skill_match_count = job.skills.len();
    }

    let (mut matched, unmatched): (Vec<_>, Vec<_>) = jobs
        .drain(..)
        .partition(|job| job.skill_match_count > 0);
    matched.sort_by(|a, b| b.skill_match_count.cmp(&a.skill_match_count));

    jobs.extend(matched);
    jobs.extend(unmatched);
}

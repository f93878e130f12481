// src/scrape/parser.rs
use super::JobRecord;
use crate::utils::clean_text;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref DIGITS_RE: Regex = Regex::new(r"(\d+)").expect("valid regex");
    static ref TRAILING_ID_RE: Regex = Regex::new(r"(\d+)$").expect("valid regex");
}

const CARD_SELECTOR: &str = "div.base-card";
const TITLE_SELECTORS: [&str; 2] = ["h3.base-search-card__title", ".base-search-card__title"];
const COMPANY_SELECTORS: [&str; 2] = ["h4.base-search-card__subtitle", ".base-search-card__subtitle"];
const LOCATION_SELECTORS: [&str; 2] = ["span.job-search-card__location", ".job-search-card__location"];
const LINK_SELECTOR: &str = "a.base-card__full-link";
const TIME_SELECTOR: &str = "time";
const SNIPPET_SELECTORS: [&str; 2] = ["p.job-search-card__snippet", ".base-search-card__metadata"];
const LOGO_SELECTOR: &str = "img.artdeco-entity-image";

/// Keywords that flag a listing as remote when found in title or location.
/// The list is part of the observable contract; do not extend it.
const REMOTE_KEYWORDS: [&str; 4] = ["remote", "work from home", "wfh", "anywhere"];

/// Extract job records from one results page. Pure function of its inputs:
/// `now` is the reference time for relative-date resolution, passed in so the
/// same markup always yields the same records.
///
/// Cards missing title, company, or apply URL after trimming are dropped
/// without error.
pub fn parse_job_cards(html: &str, skills: &[String], now: DateTime<Utc>) -> Vec<JobRecord> {
    let document = Html::parse_document(html);
    let card_selector = selector(CARD_SELECTOR);

    let mut records = Vec::new();
    for card in document.select(&card_selector) {
        if let Some(record) = parse_card(card, skills, now) {
            records.push(record);
        }
    }
    records
}

fn parse_card(card: ElementRef, skills: &[String], now: DateTime<Utc>) -> Option<JobRecord> {
    let title = first_text(card, &TITLE_SELECTORS).unwrap_or_default();
    let company = first_text(card, &COMPANY_SELECTORS).unwrap_or_default();
    let location = first_text(card, &LOCATION_SELECTORS).unwrap_or_default();
    let apply_url = card
        .select(&selector(LINK_SELECTOR))
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .unwrap_or_default();

    if title.is_empty() || company.is_empty() || apply_url.is_empty() {
        return None;
    }

    let posted_at = parse_posted_date(card, now);
    let description = first_text(card, &SNIPPET_SELECTORS).filter(|s| !s.is_empty());
    let company_logo = card
        .select(&selector(LOGO_SELECTOR))
        .next()
        .and_then(|img| {
            img.value()
                .attr("data-delayed-url")
                .or_else(|| img.value().attr("src"))
        })
        .map(|src| src.to_string());

    let external_id = card
        .value()
        .attr("data-entity-urn")
        .and_then(extract_urn_id)
        .or_else(|| extract_url_id(&apply_url));

    let matched_skills = match_skills(skills, &title, description.as_deref().unwrap_or(""));
    let is_remote = detect_remote(&title, &location);

    Some(JobRecord {
        id: external_id.clone().unwrap_or_else(|| apply_url.clone()),
        title,
        company,
        location,
        posted_at,
        is_remote,
        job_url: apply_url.clone(),
        apply_url,
        description,
        company_logo,
        external_id,
        skills: matched_skills,
        skill_match_count: 0,
    })
}

/// Absolute `datetime` attribute preferred; free-text relative date otherwise.
fn parse_posted_date(card: ElementRef, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let time_element = card.select(&selector(TIME_SELECTOR)).next()?;

    if let Some(datetime) = time_element.value().attr("datetime") {
        if let Ok(date) = NaiveDate::parse_from_str(datetime.trim(), "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    let text = clean_text(&time_element.text().collect::<Vec<_>>().join(" "));
    parse_relative_date(&text, now)
}

/// Map a relative posting phrase to an absolute time. Unknown phrasing stays
/// unparsed rather than guessing.
pub fn parse_relative_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lower = text.to_lowercase();
    if lower.contains("now") || lower.contains("today") {
        return Some(now);
    }

    let n: i64 = DIGITS_RE
        .captures(&lower)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1);

    if lower.contains("hour") {
        Some(now - Duration::hours(n))
    } else if lower.contains("day") {
        Some(now - Duration::days(n))
    } else if lower.contains("week") {
        Some(now - Duration::days(n * 7))
    } else {
        None
    }
}

/// A record is remote when title or location carries one of the fixed
/// keywords, case-insensitive.
pub fn detect_remote(title: &str, location: &str) -> bool {
    let haystack = format!("{} {}", title.to_lowercase(), location.to_lowercase());
    REMOTE_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

/// The subset of caller skills whose lowercased form appears verbatim in the
/// lowercased title + description. No stemming, no fuzzy matching.
pub fn match_skills(skills: &[String], title: &str, description: &str) -> Vec<String> {
    let haystack = format!("{} {}", title, description).to_lowercase();
    skills
        .iter()
        .filter(|skill| {
            let needle = skill.to_lowercase();
            !needle.trim().is_empty() && haystack.contains(needle.trim())
        })
        .cloned()
        .collect()
}

/// "urn:li:jobPosting:4012345678" -> "4012345678"
fn extract_urn_id(urn: &str) -> Option<String> {
    let id = urn.rsplit(':').next()?;
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id.to_string())
    } else {
        None
    }
}

/// Trailing digit run of the URL's last path segment, e.g.
/// ".../jobs/view/rust-engineer-at-acme-4012345678?refId=x" -> "4012345678".
fn extract_url_id(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    TRAILING_ID_RE
        .captures(segment)
        .map(|caps| caps[1].to_string())
}

/// First non-empty text match across a selector fallback list.
fn first_text(card: ElementRef, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(sel) = Selector::parse(selector_str) {
            if let Some(element) = card.select(&sel).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn selector(s: &str) -> Selector {
    Selector::parse(s).expect("valid selector")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn card(title: &str, company: &str, location: &str, href: &str, urn: &str, time: &str) -> String {
        format!(
            r#"<div class="base-card" data-entity-urn="{urn}">
                 <a class="base-card__full-link" href="{href}"></a>
                 <h3 class="base-search-card__title">{title}</h3>
                 <h4 class="base-search-card__subtitle">{company}</h4>
                 <span class="job-search-card__location">{location}</span>
                 {time}
               </div>"#
        )
    }

    const SKILLS: &[&str] = &["React", "Rust", "SQL"];

    fn skills() -> Vec<String> {
        SKILLS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_complete_card() {
        let html = card(
            "Senior React Developer",
            "Acme Corp",
            "Jakarta, Indonesia",
            "https://example.com/jobs/view/senior-react-developer-at-acme-4012345678?refId=abc",
            "urn:li:jobPosting:4012345678",
            r#"<time class="job-search-card__listdate" datetime="2025-06-10">5 days ago</time>"#,
        );

        let records = parse_job_cards(&html, &skills(), reference_time());
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.title, "Senior React Developer");
        assert_eq!(record.company, "Acme Corp");
        assert_eq!(record.external_id.as_deref(), Some("4012345678"));
        assert_eq!(record.skills, vec!["React".to_string()]);
        assert_eq!(
            record.posted_at,
            Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).single()
        );
        assert!(!record.is_remote);
    }

    #[test]
    fn drops_incomplete_cards() {
        let missing_company = card(
            "Backend Engineer",
            "  ",
            "Bandung",
            "https://example.com/jobs/view/1111111111",
            "",
            "",
        );
        let missing_title = card(
            "",
            "Acme Corp",
            "Bandung",
            "https://example.com/jobs/view/2222222222",
            "",
            "",
        );
        let missing_link = r#"<div class="base-card">
            <h3 class="base-search-card__title">Data Engineer</h3>
            <h4 class="base-search-card__subtitle">Acme Corp</h4>
        </div>"#;

        let html = format!("{missing_company}{missing_title}{missing_link}");
        assert!(parse_job_cards(&html, &skills(), reference_time()).is_empty());
    }

    #[test]
    fn relative_dates_resolve_against_reference_time() {
        let now = reference_time();
        assert_eq!(parse_relative_date("Posted just now", now), Some(now));
        assert_eq!(parse_relative_date("Today", now), Some(now));
        assert_eq!(
            parse_relative_date("3 hours ago", now),
            Some(now - Duration::hours(3))
        );
        assert_eq!(
            parse_relative_date("3 days ago", now),
            Some(now - Duration::days(3))
        );
        assert_eq!(
            parse_relative_date("2 weeks ago", now),
            Some(now - Duration::days(14))
        );
        // unparseable count falls back to 1
        assert_eq!(
            parse_relative_date("an hour ago", now),
            Some(now - Duration::hours(1))
        );
        assert_eq!(parse_relative_date("last month", now), None);
        assert_eq!(parse_relative_date("", now), None);
    }

    #[test]
    fn remote_detection_checks_title_and_location() {
        assert!(detect_remote("Rust Engineer (Remote)", "Jakarta"));
        assert!(detect_remote("Rust Engineer", "Anywhere"));
        assert!(detect_remote("WFH Customer Support", ""));
        assert!(detect_remote("Engineer", "Work From Home"));
        assert!(!detect_remote("Rust Engineer", "Jakarta, Indonesia"));
    }

    #[test]
    fn skill_matching_is_literal_substring() {
        let matched = match_skills(&skills(), "Senior Rust Developer", "We use PostgreSQL and SQL");
        assert_eq!(matched, vec!["Rust".to_string(), "SQL".to_string()]);

        // case-insensitive, but no synonym expansion
        let matched = match_skills(&skills(), "REACT ENGINEER", "");
        assert_eq!(matched, vec!["React".to_string()]);

        assert!(match_skills(&[], "Rust Developer", "anything").is_empty());
    }

    #[test]
    fn external_id_falls_back_to_url_path() {
        let html = card(
            "QA Engineer",
            "Acme Corp",
            "Surabaya",
            "https://example.com/jobs/view/qa-engineer-at-acme-9876543210?tracking=1",
            "",
            "",
        );
        let records = parse_job_cards(&html, &[], reference_time());
        assert_eq!(records[0].external_id.as_deref(), Some("9876543210"));

        let html = card(
            "QA Engineer",
            "Acme Corp",
            "Surabaya",
            "https://example.com/jobs/apply-here",
            "",
            "",
        );
        let records = parse_job_cards(&html, &[], reference_time());
        assert_eq!(records[0].external_id, None);
    }

    #[test]
    fn parsing_is_idempotent() {
        let html = format!(
            "{}{}",
            card(
                "Remote Rust Engineer",
                "Acme Corp",
                "Jakarta",
                "https://example.com/jobs/view/1234567890",
                "urn:li:jobPosting:1234567890",
                r#"<time>2 days ago</time>"#,
            ),
            card(
                "Designer",
                "Beta Ltd",
                "Bali",
                "https://example.com/jobs/view/2345678901",
                "",
                "",
            )
        );

        let now = reference_time();
        let first = parse_job_cards(&html, &skills(), now);
        let second = parse_job_cards(&html, &skills(), now);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}

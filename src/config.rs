// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Environment-level configuration, loaded from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        Self::load_from_file(&environment)
    }

    fn get_environment() -> String {
        std::env::var("JOBSCOUT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory. Server cannot start without configuration.");
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            data_dir: Self::resolve_path(&env_config.data_dir)?,
        })
    }

    fn resolve_path(path: &PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.clone())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the data directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if !self.data_dir.exists() {
            tokio::fs::create_dir_all(&self.data_dir)
                .await
                .with_context(|| {
                    format!("Failed to create directory: {}", self.data_dir.display())
                })?;
        }
        Ok(())
    }
}

/// Immutable scraper settings shared by every pipeline run. The inter-request
/// delay is a deliberate throttle toward the upstream job source, not a tuning
/// knob: one request per second keeps the source from blocking us.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub default_location: String,
    pub user_agent: String,
    pub page_size: usize,
    pub max_pages_per_keyword: usize,
    pub fetch_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url:
                "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search"
                    .to_string(),
            default_location: "Indonesia".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            page_size: 25,
            max_pages_per_keyword: 3,
            fetch_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(30),
        }
    }
}

// src/recommendation/store.rs
use crate::utils::normalize_user_id;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

/// Extracted text of a previously uploaded CV.
#[derive(Debug, Clone)]
pub struct CvDocument {
    pub content: String,
}

/// Document-store boundary: the recommendation service only needs the
/// extracted CV text for a user, however it is kept.
#[async_trait]
pub trait CvStore: Send + Sync {
    async fn get_cv_document(&self, user_id: &str) -> Result<Option<CvDocument>>;
}

/// Reads extracted CV text from `{data_dir}/{user}/cv_extracted.txt`.
pub struct FsCvStore {
    data_dir: PathBuf,
}

impl FsCvStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn document_path(&self, user_id: &str) -> PathBuf {
        self.data_dir
            .join(normalize_user_id(user_id))
            .join("cv_extracted.txt")
    }
}

#[async_trait]
impl CvStore for FsCvStore {
    async fn get_cv_document(&self, user_id: &str) -> Result<Option<CvDocument>> {
        let path = self.document_path(user_id);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read CV document: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        info!("Loaded CV document for user: {}", user_id);
        Ok(Some(CvDocument { content }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_document_is_none_not_error() {
        let store = FsCvStore::new(PathBuf::from("/nonexistent/jobscout-test"));
        let result = store.get_cv_document("u1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn reads_existing_document() {
        let dir = std::env::temp_dir().join(format!("jobscout-store-{}", std::process::id()));
        let user_dir = dir.join("u1");
        tokio::fs::create_dir_all(&user_dir).await.unwrap();
        tokio::fs::write(user_dir.join("cv_extracted.txt"), "Rust engineer, 5 years")
            .await
            .unwrap();

        let store = FsCvStore::new(dir.clone());
        let document = store.get_cv_document("u1").await.unwrap().unwrap();
        assert_eq!(document.content, "Rust engineer, 5 years");

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }

    #[tokio::test]
    async fn blank_document_is_treated_as_missing() {
        let dir = std::env::temp_dir().join(format!("jobscout-blank-{}", std::process::id()));
        let user_dir = dir.join("u2");
        tokio::fs::create_dir_all(&user_dir).await.unwrap();
        tokio::fs::write(user_dir.join("cv_extracted.txt"), "  \n ")
            .await
            .unwrap();

        let store = FsCvStore::new(dir.clone());
        assert!(store.get_cv_document("u2").await.unwrap().is_none());

        tokio::fs::remove_dir_all(dir).await.unwrap();
    }
}

//! KnowledgeApi trait: the data-fetching collaborator the engine drives
//!
//! Abstracts over transport (HTTP client, fixtures, mocks) so the engine
//! never depends on how the knowledge service is reached. Implementations
//! own their own caching; the engine never retries.

use super::wire::{CollectReceipt, KnowledgeMap};
use crate::model::Article;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from knowledge service calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("response decode error: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
}

#[async_trait]
pub trait KnowledgeApi: Send + Sync {
    /// `GET /knowledge-map`
    async fn knowledge_map(&self) -> Result<KnowledgeMap, ApiError>;

    /// `GET /search/articles_by_concept?concept_name=`
    async fn articles_by_concept(&self, concept_name: &str) -> Result<Vec<Article>, ApiError>;

    /// `POST /collections/concepts`. Any non-2xx answer is an error.
    async fn collect_concept(&self, concept_id: i64) -> Result<CollectReceipt, ApiError>;
}

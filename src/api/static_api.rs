//! StaticApi: serves preconfigured responses
//!
//! Built in code for tests, or from a JSON fixture of response envelopes for
//! offline replays. Records every search and collect call so callers can
//! assert on how many requests the engine issued.

use super::traits::{ApiError, KnowledgeApi};
use super::wire::{decode_envelope_value, ArticleSearch, CollectReceipt, KnowledgeMap};
use crate::model::Article;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// Errors loading a fixture file
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fixture is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fixture response for {what}: {source}")]
    Response { what: String, source: ApiError },
    #[error("collect failure key is not a concept id: {0}")]
    BadConceptId(String),
}

/// A failure the fixture wants a collect call to produce
#[derive(Debug, Clone, Deserialize)]
struct FixtureFailure {
    status: u16,
    #[serde(default)]
    message: String,
}

/// On-disk fixture: raw response bodies keyed by request
#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    knowledge_map: Option<serde_json::Value>,
    #[serde(default)]
    articles_by_concept: HashMap<String, serde_json::Value>,
    #[serde(default)]
    collect_failures: HashMap<String, FixtureFailure>,
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct StaticApi {
    knowledge_map: Result<KnowledgeMap, ApiError>,
    searches: HashMap<String, Result<Vec<Article>, ApiError>>,
    collect_failures: HashMap<i64, ApiError>,
    collect_latency: Option<Duration>,
    collect_calls: Mutex<Vec<i64>>,
    search_calls: Mutex<Vec<String>>,
}

impl StaticApi {
    /// An API with an empty knowledge map, no articles, and collects that
    /// always succeed.
    pub fn new() -> Self {
        Self {
            knowledge_map: Ok(KnowledgeMap::default()),
            searches: HashMap::new(),
            collect_failures: HashMap::new(),
            collect_latency: None,
            collect_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_knowledge_map(mut self, map: KnowledgeMap) -> Self {
        self.knowledge_map = Ok(map);
        self
    }

    pub fn with_knowledge_map_failure(mut self, error: ApiError) -> Self {
        self.knowledge_map = Err(error);
        self
    }

    /// Register the articles a concept search returns.
    pub fn with_articles(
        mut self,
        concept_name: impl Into<String>,
        articles: Vec<Article>,
    ) -> Self {
        self.searches.insert(concept_name.into(), Ok(articles));
        self
    }

    pub fn with_search_failure(mut self, concept_name: impl Into<String>, error: ApiError) -> Self {
        self.searches.insert(concept_name.into(), Err(error));
        self
    }

    pub fn with_collect_failure(mut self, concept_id: i64, error: ApiError) -> Self {
        self.collect_failures.insert(concept_id, error);
        self
    }

    /// Delay every collect call, keeping the request in flight.
    pub fn with_collect_latency(mut self, latency: Duration) -> Self {
        self.collect_latency = Some(latency);
        self
    }

    /// Load responses from a JSON fixture file.
    pub fn from_fixture_file(path: &Path) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_fixture_str(&text)
    }

    /// Load responses from fixture JSON text.
    pub fn from_fixture_str(text: &str) -> Result<Self, FixtureError> {
        let fixture: Fixture = serde_json::from_str(text)?;
        let mut api = Self::new();

        if let Some(body) = fixture.knowledge_map {
            let map: KnowledgeMap = decode_envelope_value(body).map_err(|source| {
                FixtureError::Response { what: "knowledge_map".to_string(), source }
            })?;
            api = api.with_knowledge_map(map);
        }

        for (concept_name, body) in fixture.articles_by_concept {
            let search: ArticleSearch = decode_envelope_value(body).map_err(|source| {
                FixtureError::Response {
                    what: format!("articles_by_concept[{}]", concept_name),
                    source,
                }
            })?;
            api = api.with_articles(concept_name, search.articles);
        }

        for (key, failure) in fixture.collect_failures {
            let concept_id: i64 = key.parse().map_err(|_| FixtureError::BadConceptId(key.clone()))?;
            api = api.with_collect_failure(
                concept_id,
                ApiError::Status { status: failure.status, message: failure.message },
            );
        }

        Ok(api)
    }

    /// Concept ids passed to `collect_concept`, in call order
    pub fn collect_calls(&self) -> Vec<i64> {
        locked(&self.collect_calls).clone()
    }

    /// Concept names passed to `articles_by_concept`, in call order
    pub fn search_calls(&self) -> Vec<String> {
        locked(&self.search_calls).clone()
    }
}

impl Default for StaticApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeApi for StaticApi {
    async fn knowledge_map(&self) -> Result<KnowledgeMap, ApiError> {
        self.knowledge_map.clone()
    }

    async fn articles_by_concept(&self, concept_name: &str) -> Result<Vec<Article>, ApiError> {
        locked(&self.search_calls).push(concept_name.to_string());
        match self.searches.get(concept_name) {
            Some(result) => result.clone(),
            None => Ok(Vec::new()),
        }
    }

    async fn collect_concept(&self, concept_id: i64) -> Result<CollectReceipt, ApiError> {
        locked(&self.collect_calls).push(concept_id);
        if let Some(latency) = self.collect_latency {
            tokio::time::sleep(latency).await;
        }
        match self.collect_failures.get(&concept_id) {
            Some(error) => Err(error.clone()),
            None => Ok(CollectReceipt {
                message: format!("concept {} collected", concept_id),
            }),
        }
    }
}

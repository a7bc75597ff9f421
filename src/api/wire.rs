//! Response shapes of the knowledge service
//!
//! Every response body is wrapped in `{ "data": ... }`.

use super::traits::ApiError;
use crate::model::{Article, Concept};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The common `{ data: ... }` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Unwrap an envelope from a response body.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

/// Same as [`decode_envelope`] for an already-parsed JSON value.
pub fn decode_envelope_value<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    let envelope: Envelope<T> =
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

/// A node of `GET /knowledge-map`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: i64,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub real_world_examples: Vec<String>,
    #[serde(default)]
    pub is_collected: bool,
}

impl From<&MapNode> for Concept {
    fn from(node: &MapNode) -> Self {
        Concept {
            concept_id: node.id,
            name: node.label.clone(),
            description_ko: node.description.clone(),
            real_world_examples_ko: node.real_world_examples.clone(),
            is_collected: node.is_collected,
        }
    }
}

/// Body of `GET /knowledge-map`
///
/// Edges are carried through untyped; the engine does not draw relations
/// between collected concepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeMap {
    #[serde(default)]
    pub nodes: Vec<MapNode>,
    #[serde(default)]
    pub edges: Vec<serde_json::Value>,
}

impl KnowledgeMap {
    /// Concepts the user has collected, in server order
    pub fn collected_concepts(&self) -> Vec<Concept> {
        self.nodes
            .iter()
            .filter(|n| n.is_collected)
            .map(Concept::from)
            .collect()
    }
}

/// Body of `GET /search/articles_by_concept`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSearch {
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Body sent to `POST /collections/concepts`
///
/// [`StaticApi`](crate::StaticApi) never serializes it. It pins the request
/// shape for an HTTP-backed [`KnowledgeApi`](crate::KnowledgeApi).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectRequest {
    pub concept_id: i64,
}

/// Body of a successful `POST /collections/concepts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectReceipt {
    pub message: String,
}

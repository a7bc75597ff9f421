//! Domain entities as the knowledge service serves them
//!
//! Field names follow the service's snake_case JSON, so these types
//! deserialize straight out of response envelopes.

use serde::{Deserialize, Serialize};

/// Description used for concepts whose details are not yet known locally.
pub const PLACEHOLDER_DESCRIPTION: &str = "...";

/// A named idea the user can collect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub concept_id: i64,
    pub name: String,
    #[serde(default)]
    pub description_ko: String,
    #[serde(default)]
    pub real_world_examples_ko: Vec<String>,
    #[serde(default)]
    pub is_collected: bool,
}

impl Concept {
    /// A collected concept whose description and examples have not been
    /// fetched yet.
    pub fn provisional(concept_id: i64, name: impl Into<String>) -> Self {
        Self {
            concept_id,
            name: name.into(),
            description_ko: PLACEHOLDER_DESCRIPTION.to_string(),
            real_world_examples_ko: Vec::new(),
            is_collected: true,
        }
    }
}

/// A concept surfaced by an article, not yet collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeConcept {
    pub concept_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub strength: f64,
}

/// An article from the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_ko: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_ko: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub relative_concepts: Vec<RelativeConcept>,
}

impl Article {
    /// Korean title when present, original title otherwise.
    pub fn display_title(&self) -> &str {
        self.title_ko.as_deref().unwrap_or(&self.title)
    }
}

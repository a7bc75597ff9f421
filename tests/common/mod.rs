//! Shared builders for exploration tests

#![allow(dead_code)]

use knowmap::api::{KnowledgeMap, MapNode};
use knowmap::model::{Article, RelativeConcept};
use knowmap::NodeId;

pub fn id(s: &str) -> NodeId {
    NodeId::from_string(s)
}

/// A knowledge map in which every listed concept is collected
pub fn collected_map(concepts: &[(i64, &str)]) -> KnowledgeMap {
    KnowledgeMap {
        nodes: concepts
            .iter()
            .map(|(concept_id, label)| MapNode {
                id: *concept_id,
                label: label.to_string(),
                description: format!("{} description", label),
                real_world_examples: Vec::new(),
                is_collected: true,
            })
            .collect(),
        edges: Vec::new(),
    }
}

pub fn candidate(concept_id: i64, name: &str) -> RelativeConcept {
    RelativeConcept {
        concept_id,
        name: name.to_string(),
        relation_type: Some("related_to".to_string()),
        strength: 0.7,
    }
}

pub fn article(article_id: i64, candidates: Vec<RelativeConcept>) -> Article {
    Article {
        article_id,
        title: format!("Article {}", article_id),
        title_ko: None,
        content_preview: None,
        url: format!("https://news.example.com/{}", article_id),
        original_url: None,
        summary_ko: None,
        created_at: None,
        relative_concepts: candidates,
    }
}

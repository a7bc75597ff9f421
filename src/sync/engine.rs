//! SyncEngine: drives the graph from clicks and knowledge service responses
//!
//! The graph sits behind a mutex that is never held across an `.await`.
//! Each step re-reads the graph after its fetch resolves, so a response that
//! arrives late merges into the graph as it is now, not as it was when the
//! click happened.

use super::events::GraphEvent;
use super::guard::PromotionGuard;
use crate::api::KnowledgeApi;
use crate::config::EngineConfig;
use crate::graph::catalog::concept_node_id;
use crate::graph::{
    EdgeId, Graph, GraphNode, GraphSnapshot, MergeReport, NodeData, NodeId, NodeKind,
};
use crate::model::Article;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// How the graph gets its first nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// The user's collected concepts from the knowledge map
    Snapshot,
    /// A single concept known by name, expanded right away
    Concept(String),
}

/// What a click did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// A collected concept was expanded into articles
    ArticlesMerged(MergeReport),
    /// An article was expanded into candidate concepts
    CandidatesMerged(MergeReport),
    /// A candidate was promoted; `confirmed` is false if the service refused
    Promoted { node_id: NodeId, concept_id: i64, confirmed: bool },
    /// A candidate whose concept is already collected elsewhere was dropped
    DuplicateDiscarded { removed_edges: Vec<EdgeId> },
    /// A promotion of this node is still in flight
    AlreadyInFlight,
    /// The candidate was already promoted
    AlreadyCollected,
    /// The concept search failed; the graph is unchanged
    SearchFailed,
    /// The node no longer exists
    UnknownNode,
    /// The node's current kind does not match the clicked kind
    Stale { current: NodeKind },
}

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SyncEngine {
    api: Arc<dyn KnowledgeApi>,
    graph: Mutex<Graph>,
    guard: PromotionGuard,
    selected: Mutex<Option<Article>>,
    /// Grows until drained with [`SyncEngine::take_events`].
    events: Mutex<Vec<GraphEvent>>,
}

impl SyncEngine {
    /// Create an engine with an empty graph and the default layout
    pub fn new(api: Arc<dyn KnowledgeApi>) -> Self {
        Self::with_config(api, &EngineConfig::default())
    }

    pub fn with_config(api: Arc<dyn KnowledgeApi>, config: &EngineConfig) -> Self {
        Self {
            api,
            graph: Mutex::new(Graph::with_layout(config.layout.clone())),
            guard: PromotionGuard::new(),
            selected: Mutex::new(None),
            events: Mutex::new(Vec::new()),
        }
    }

    fn graph(&self) -> MutexGuard<'_, Graph> {
        locked(&self.graph)
    }

    fn emit(&self, event: GraphEvent) {
        locked(&self.events).push(event);
    }

    fn record_merge(&self, report: &MergeReport) {
        if !report.nodes_added.is_empty() {
            self.emit(GraphEvent::NodesAdded { node_ids: report.nodes_added.clone() });
        }
        if !report.edges_added.is_empty() {
            self.emit(GraphEvent::EdgesAdded { edge_ids: report.edges_added.clone() });
        }
    }

    // ── Seeding ─────────────────────────────────────────────────────────

    /// Populate the graph from `seed`.
    ///
    /// A concept seed is expanded immediately; the returned report covers
    /// both the seed node and its articles.
    pub async fn start(&self, seed: &Seed) -> MergeReport {
        match seed {
            Seed::Snapshot => self.load_snapshot().await,
            Seed::Concept(name) => {
                let mut report = self.graph().seed_concept(name);
                self.record_merge(&report);
                if report.is_noop() {
                    return report;
                }
                if let ClickOutcome::ArticlesMerged(expansion) =
                    self.expand_concept(&concept_node_id(0)).await
                {
                    report.nodes_added.extend(expansion.nodes_added);
                    report.edges_added.extend(expansion.edges_added);
                }
                report
            }
        }
    }

    /// Fetch the knowledge map and seed the graph with collected concepts.
    ///
    /// A graph the user has already built is left alone.
    pub async fn load_snapshot(&self) -> MergeReport {
        let map = match self.api.knowledge_map().await {
            Ok(map) => map,
            Err(e) => {
                warn!("knowledge map fetch failed: {}", e);
                self.emit(GraphEvent::SnapshotFailed { error: e.to_string() });
                return MergeReport::default();
            }
        };

        let collected = map.collected_concepts();
        let report = {
            let mut graph = self.graph();
            if !graph.is_empty() {
                None
            } else {
                Some(graph.load_snapshot(&collected))
            }
        };

        match report {
            Some(report) => {
                info!("snapshot loaded with {} collected concepts", report.nodes_added.len());
                self.record_merge(&report);
                report
            }
            None => {
                debug!("snapshot ignored: graph already populated");
                self.emit(GraphEvent::SnapshotSkipped);
                MergeReport::default()
            }
        }
    }

    // ── Clicks ──────────────────────────────────────────────────────────

    /// Handle a click on `node_id`, which the surface drew as `kind`.
    pub async fn click(&self, node_id: &NodeId, kind: NodeKind) -> ClickOutcome {
        debug!("click on {} ({})", node_id, kind);
        match kind {
            NodeKind::Collected => self.expand_concept(node_id).await,
            NodeKind::Article => self.expand_article(node_id),
            NodeKind::Candidate => self.promote(node_id).await,
        }
    }

    /// Search articles for a collected concept and attach them.
    async fn expand_concept(&self, node_id: &NodeId) -> ClickOutcome {
        let name = {
            let graph = self.graph();
            let Some(node) = graph.node(node_id) else {
                return ClickOutcome::UnknownNode;
            };
            let Some(concept) = node.as_concept() else {
                return ClickOutcome::Stale { current: node.kind() };
            };
            concept.name.clone()
        };

        let articles = match self.api.articles_by_concept(&name).await {
            Ok(articles) => articles,
            Err(e) => {
                warn!("article search for '{}' failed: {}", name, e);
                self.emit(GraphEvent::SearchFailed {
                    node_id: node_id.clone(),
                    concept_name: name,
                    error: e.to_string(),
                });
                return ClickOutcome::SearchFailed;
            }
        };

        let report = self.graph().merge_article_expansion(node_id, &articles);
        debug!(
            "'{}': {} articles found, {} new",
            name,
            articles.len(),
            report.nodes_added.len()
        );
        self.record_merge(&report);
        ClickOutcome::ArticlesMerged(report)
    }

    /// Attach an article's candidate concepts and select the article.
    fn expand_article(&self, node_id: &NodeId) -> ClickOutcome {
        let (article, report) = {
            let mut graph = self.graph();
            let Some(node) = graph.node(node_id) else {
                return ClickOutcome::UnknownNode;
            };
            let Some(article) = node.as_article().cloned() else {
                return ClickOutcome::Stale { current: node.kind() };
            };
            let report = graph.merge_concept_expansion(node_id, &article.relative_concepts);
            (article, report)
        };

        debug!(
            "article {}: {} new candidates",
            article.article_id,
            report.nodes_added.len()
        );
        *locked(&self.selected) = Some(article);
        self.record_merge(&report);
        ClickOutcome::CandidatesMerged(report)
    }

    /// Collect a candidate: optimistic local promotion, then the service call.
    async fn promote(&self, node_id: &NodeId) -> ClickOutcome {
        let Some(ticket) = self.guard.try_acquire(node_id) else {
            debug!("promotion of {} already in flight, skipping", node_id);
            return ClickOutcome::AlreadyInFlight;
        };

        let candidate = {
            let mut graph = self.graph();
            let Some(node) = graph.node(node_id) else {
                return ClickOutcome::UnknownNode;
            };
            let candidate = match &node.data {
                NodeData::Candidate(rc) => rc.clone(),
                NodeData::Collected(_) => return ClickOutcome::AlreadyCollected,
                NodeData::Article(_) => return ClickOutcome::Stale { current: NodeKind::Article },
            };

            if graph.collected_match(candidate.concept_id, &candidate.name).is_some() {
                let removed_edges = graph.remove_edges_touching(node_id);
                graph.remove_node(node_id);
                drop(graph);
                drop(ticket);
                info!(
                    "'{}' ({}) already collected, discarding duplicate {}",
                    candidate.name, candidate.concept_id, node_id
                );
                self.emit(GraphEvent::NodesRemoved { node_ids: vec![node_id.clone()] });
                if !removed_edges.is_empty() {
                    self.emit(GraphEvent::EdgesRemoved { edge_ids: removed_edges.clone() });
                }
                return ClickOutcome::DuplicateDiscarded { removed_edges };
            }

            if !graph.promote_candidate(node_id, candidate.concept_id, &candidate.name) {
                return ClickOutcome::Stale { current: NodeKind::Candidate };
            }
            candidate
        };

        self.emit(GraphEvent::NodePromoted {
            node_id: node_id.clone(),
            concept_id: candidate.concept_id,
        });

        let result = self.api.collect_concept(candidate.concept_id).await;
        drop(ticket);

        match result {
            Ok(receipt) => {
                info!("collected '{}': {}", candidate.name, receipt.message);
                self.emit(GraphEvent::CollectConfirmed {
                    node_id: node_id.clone(),
                    concept_id: candidate.concept_id,
                    message: receipt.message,
                });
                ClickOutcome::Promoted {
                    node_id: node_id.clone(),
                    concept_id: candidate.concept_id,
                    confirmed: true,
                }
            }
            Err(e) => {
                // The optimistic promotion is kept; the failure is only reported.
                warn!("collecting '{}' failed: {}", candidate.name, e);
                self.emit(GraphEvent::CollectFailed {
                    node_id: node_id.clone(),
                    concept_id: candidate.concept_id,
                    error: e.to_string(),
                });
                ClickOutcome::Promoted {
                    node_id: node_id.clone(),
                    concept_id: candidate.concept_id,
                    confirmed: false,
                }
            }
        }
    }

    // ── Read side for rendering surfaces ────────────────────────────────

    /// Current nodes and edges, sorted by id
    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph().snapshot()
    }

    pub fn node(&self, id: &NodeId) -> Option<GraphNode> {
        self.graph().node(id).cloned()
    }

    /// Run a read-only closure against the current graph
    pub fn with_graph<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        let graph = self.graph();
        f(&graph)
    }

    /// True while a collect request for `id` is in flight
    pub fn is_promoting(&self, id: &NodeId) -> bool {
        self.guard.is_in_flight(id)
    }

    /// The article last expanded, for a detail panel
    pub fn selected_article(&self) -> Option<Article> {
        locked(&self.selected).clone()
    }

    pub fn clear_selection(&self) {
        *locked(&self.selected) = None;
    }

    /// Drain events accumulated since the last call.
    ///
    /// The log is unbounded, so a surface drains it after every click.
    pub fn take_events(&self) -> Vec<GraphEvent> {
        std::mem::take(&mut *locked(&self.events))
    }
}

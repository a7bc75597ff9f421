//! End-to-end exploration sessions driven through the SyncEngine
//!
//! Run with: `cargo test --test exploration_scenarios`

mod common;

use common::{article, candidate, collected_map, id};
use knowmap::api::ApiError;
use knowmap::{
    ClickOutcome, EdgeId, GraphEvent, NodeKind, Position, Seed, StaticApi, SyncEngine,
};
use std::sync::Arc;
use std::time::Duration;

/// Inflation is collected; searching it finds articles 7 and 12, both of
/// which surface Tariff (9) as a candidate.
fn tariff_api() -> StaticApi {
    StaticApi::new()
        .with_knowledge_map(collected_map(&[(1, "Inflation")]))
        .with_articles(
            "Inflation",
            vec![
                article(7, vec![candidate(9, "Tariff")]),
                article(12, vec![candidate(9, "Tariff")]),
            ],
        )
}

/// Load the snapshot and expand Inflation plus both articles.
async fn explored(api: Arc<StaticApi>) -> SyncEngine {
    let engine = SyncEngine::new(api);
    engine.start(&Seed::Snapshot).await;
    engine.click(&id("concept-1"), NodeKind::Collected).await;
    engine.click(&id("article-7"), NodeKind::Article).await;
    engine.click(&id("article-12"), NodeKind::Article).await;
    engine.take_events();
    engine
}

// ============================================================================
// Snapshot
// ============================================================================

#[tokio::test]
async fn snapshot_seeds_single_concept_at_grid_origin() {
    let engine = SyncEngine::new(Arc::new(tariff_api()));

    engine.start(&Seed::Snapshot).await;

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.nodes.len(), 1);
    assert_eq!(snapshot.nodes[0].id, id("concept-1"));
    assert_eq!(snapshot.nodes[0].kind(), NodeKind::Collected);
    assert_eq!(snapshot.nodes[0].position, Position::new(100.0, 150.0));
    assert!(snapshot.edges.is_empty());
}

#[tokio::test]
async fn late_snapshot_does_not_clobber_exploration() {
    let engine = explored(Arc::new(tariff_api())).await;
    let before = engine.snapshot();

    engine.load_snapshot().await;

    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.take_events(), vec![GraphEvent::SnapshotSkipped]);
}

// ============================================================================
// Expansion
// ============================================================================

#[tokio::test]
async fn concept_expansion_is_idempotent() {
    let api = Arc::new(
        StaticApi::new()
            .with_knowledge_map(collected_map(&[(1, "Inflation")]))
            .with_articles("Inflation", vec![article(7, vec![])]),
    );
    let engine = SyncEngine::new(api.clone());
    engine.start(&Seed::Snapshot).await;

    let first = engine.click(&id("concept-1"), NodeKind::Collected).await;
    let after_first = engine.snapshot();
    let second = engine.click(&id("concept-1"), NodeKind::Collected).await;

    match first {
        ClickOutcome::ArticlesMerged(report) => {
            assert_eq!(report.nodes_added, vec![id("article-7")]);
            assert_eq!(report.edges_added, vec![EdgeId::from("edge-concept-1-article-7")]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert!(matches!(second, ClickOutcome::ArticlesMerged(ref r) if r.is_noop()));
    assert_eq!(engine.snapshot(), after_first);
    // Both clicks hit the service; the merge is what deduplicates
    assert_eq!(api.search_calls().len(), 2);
}

#[tokio::test]
async fn article_expansion_adds_scoped_candidate() {
    let engine = SyncEngine::new(Arc::new(tariff_api()));
    engine.start(&Seed::Snapshot).await;
    engine.click(&id("concept-1"), NodeKind::Collected).await;

    let outcome = engine.click(&id("article-7"), NodeKind::Article).await;

    match outcome {
        ClickOutcome::CandidatesMerged(report) => {
            assert_eq!(report.nodes_added, vec![id("relative-7-9")]);
            assert_eq!(report.edges_added, vec![EdgeId::from("edge-article-7-relative-7-9")]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    let node = engine.node(&id("relative-7-9")).unwrap();
    assert_eq!(node.kind(), NodeKind::Candidate);
    let parent = engine.node(&id("article-7")).unwrap().position;
    assert_eq!(node.position.x, parent.x + 250.0);
    assert_eq!(node.position.y, parent.y);
}

#[tokio::test]
async fn articles_fan_out_around_parent() {
    let engine = SyncEngine::new(Arc::new(tariff_api()));
    engine.start(&Seed::Snapshot).await;

    engine.click(&id("concept-1"), NodeKind::Collected).await;

    let a7 = engine.node(&id("article-7")).unwrap().position;
    let a12 = engine.node(&id("article-12")).unwrap().position;
    assert_eq!(a7, Position::new(350.0, 100.0));
    assert_eq!(a12, Position::new(350.0, 200.0));
}

// ============================================================================
// Promotion
// ============================================================================

#[tokio::test]
async fn rapid_double_click_issues_one_collect() {
    let api = Arc::new(tariff_api().with_collect_latency(Duration::from_millis(50)));
    let engine = explored(api.clone()).await;
    let target = id("relative-7-9");

    let (first, second) = tokio::join!(
        engine.click(&target, NodeKind::Candidate),
        engine.click(&target, NodeKind::Candidate),
    );

    assert_eq!(
        first,
        ClickOutcome::Promoted { node_id: target.clone(), concept_id: 9, confirmed: true }
    );
    assert_eq!(second, ClickOutcome::AlreadyInFlight);
    assert_eq!(api.collect_calls(), vec![9]);

    let node = engine.node(&target).unwrap();
    assert_eq!(node.kind(), NodeKind::Collected);
    assert_eq!(node.concept_id(), Some(9));
    assert!(!engine.is_promoting(&target));
}

#[tokio::test]
async fn promoting_predicate_is_true_while_request_in_flight() {
    let api = Arc::new(tariff_api().with_collect_latency(Duration::from_millis(50)));
    let engine = explored(api).await;
    let target = id("relative-7-9");

    let observe = async {
        tokio::task::yield_now().await;
        engine.is_promoting(&target)
    };
    let (_, seen_in_flight) = tokio::join!(engine.click(&target, NodeKind::Candidate), observe);

    assert!(seen_in_flight);
    assert!(!engine.is_promoting(&target));
}

#[tokio::test]
async fn click_after_promotion_completes_is_already_collected() {
    let api = Arc::new(tariff_api());
    let engine = explored(api.clone()).await;
    let target = id("relative-7-9");

    engine.click(&target, NodeKind::Candidate).await;
    let again = engine.click(&target, NodeKind::Candidate).await;

    assert_eq!(again, ClickOutcome::AlreadyCollected);
    assert_eq!(api.collect_calls(), vec![9]);
}

#[tokio::test]
async fn promotion_keeps_id_position_and_edges() {
    let engine = explored(Arc::new(tariff_api())).await;
    let target = id("relative-7-9");
    let before = engine.node(&target).unwrap();
    let edges_before = engine.snapshot().edges;

    engine.click(&target, NodeKind::Candidate).await;

    let after = engine.node(&target).unwrap();
    assert_eq!(after.position, before.position);
    assert_eq!(after.label(), "Tariff");
    assert_eq!(after.as_concept().unwrap().description_ko, "...");
    assert_eq!(engine.snapshot().edges, edges_before);
}

#[tokio::test]
async fn duplicate_candidate_is_discarded_without_collect() {
    let api = Arc::new(tariff_api());
    let engine = explored(api.clone()).await;

    engine.click(&id("relative-7-9"), NodeKind::Candidate).await;
    engine.take_events();
    let outcome = engine.click(&id("relative-12-9"), NodeKind::Candidate).await;

    assert_eq!(
        outcome,
        ClickOutcome::DuplicateDiscarded {
            removed_edges: vec![EdgeId::from("edge-article-12-relative-12-9")]
        }
    );
    assert!(engine.node(&id("relative-12-9")).is_none());
    assert!(engine
        .snapshot()
        .edges
        .iter()
        .all(|e| e.id != EdgeId::from("edge-article-12-relative-12-9")));
    assert_eq!(api.collect_calls(), vec![9]);
    assert!(!engine.is_promoting(&id("relative-12-9")));
    assert_eq!(
        engine.take_events(),
        vec![
            GraphEvent::NodesRemoved { node_ids: vec![id("relative-12-9")] },
            GraphEvent::EdgesRemoved {
                edge_ids: vec![EdgeId::from("edge-article-12-relative-12-9")]
            },
        ]
    );
}

#[tokio::test]
async fn duplicate_discarded_while_first_collect_in_flight() {
    let api = Arc::new(tariff_api().with_collect_latency(Duration::from_millis(50)));
    let engine = explored(api.clone()).await;

    let (kept, duplicate) = (id("relative-7-9"), id("relative-12-9"));
    let (first, second) = tokio::join!(
        engine.click(&kept, NodeKind::Candidate),
        engine.click(&duplicate, NodeKind::Candidate),
    );

    assert!(matches!(first, ClickOutcome::Promoted { confirmed: true, .. }));
    assert!(matches!(second, ClickOutcome::DuplicateDiscarded { .. }));
    assert_eq!(api.collect_calls(), vec![9]);
    engine.with_graph(|g| {
        assert_eq!(g.collected_node_for(9).unwrap().id, id("relative-7-9"));
    });
}

#[tokio::test]
async fn candidate_of_snapshot_concept_is_discarded() {
    let api = Arc::new(
        StaticApi::new()
            .with_knowledge_map(collected_map(&[(1, "Inflation"), (9, "Tariff")]))
            .with_articles("Inflation", vec![article(7, vec![candidate(9, "Tariff")])]),
    );
    let engine = explored(api.clone()).await;

    let outcome = engine.click(&id("relative-7-9"), NodeKind::Candidate).await;

    assert!(matches!(outcome, ClickOutcome::DuplicateDiscarded { .. }));
    assert!(api.collect_calls().is_empty());
}

#[tokio::test]
async fn failed_collect_keeps_optimistic_promotion_and_reports() {
    let api = Arc::new(tariff_api().with_collect_failure(
        9,
        ApiError::Status { status: 500, message: "internal error".to_string() },
    ));
    let engine = explored(api).await;
    let target = id("relative-7-9");

    let outcome = engine.click(&target, NodeKind::Candidate).await;

    assert_eq!(
        outcome,
        ClickOutcome::Promoted { node_id: target.clone(), concept_id: 9, confirmed: false }
    );
    assert_eq!(engine.node(&target).unwrap().kind(), NodeKind::Collected);
    assert!(!engine.is_promoting(&target));
    let events = engine.take_events();
    assert!(events.contains(&GraphEvent::NodePromoted { node_id: target.clone(), concept_id: 9 }));
    assert!(events
        .iter()
        .any(|e| matches!(e, GraphEvent::CollectFailed { concept_id: 9, .. })));
}

#[tokio::test]
async fn promoted_candidate_can_be_expanded_like_any_concept() {
    let api = Arc::new(tariff_api().with_articles("Tariff", vec![article(30, vec![])]));
    let engine = explored(api).await;
    engine.click(&id("relative-7-9"), NodeKind::Candidate).await;

    let outcome = engine.click(&id("relative-7-9"), NodeKind::Collected).await;

    assert!(matches!(
        outcome,
        ClickOutcome::ArticlesMerged(ref r) if r.nodes_added == vec![id("article-30")]
    ));
    assert!(engine.node(&id("article-30")).is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_clicks_across_tasks_collect_once() {
    let api = Arc::new(tariff_api().with_collect_latency(Duration::from_millis(50)));
    let engine = Arc::new(explored(api.clone()).await);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine.click(&id("relative-7-9"), NodeKind::Candidate).await
            })
        })
        .collect();

    let mut promoted = 0;
    for handle in handles {
        if let ClickOutcome::Promoted { .. } = handle.await.unwrap() {
            promoted += 1;
        }
    }

    assert_eq!(promoted, 1);
    assert_eq!(api.collect_calls(), vec![9]);
}

// ============================================================================
// Recorded session
// ============================================================================

#[tokio::test]
async fn fixture_session_replays() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/session.json");
    let api = Arc::new(StaticApi::from_fixture_file(&path).unwrap());
    let engine = SyncEngine::new(api.clone());

    engine.start(&Seed::Snapshot).await;
    // Recession is in the map but not collected
    assert_eq!(engine.snapshot().nodes.len(), 1);

    engine.click(&id("concept-1"), NodeKind::Collected).await;
    engine.click(&id("article-7"), NodeKind::Article).await;
    let supply_chain = engine.click(&id("relative-7-10"), NodeKind::Candidate).await;

    assert!(matches!(supply_chain, ClickOutcome::Promoted { confirmed: false, .. }));
    assert_eq!(engine.selected_article().unwrap().display_title(), "관세가 물가를 끌어올리다");
    assert_eq!(api.collect_calls(), vec![10]);
}

//! Orchestrator turn flows against in-process fake collaborators.
//!
//! No network: the catalog and oracle are replaced by fakes that return
//! canned pools, fail on demand, and count calls.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stylist_common::{CatalogQuery, RawCatalogItem, Slot, TurnAction, UserId};
use stylistd::catalog::{CatalogError, CatalogLookup};
use stylistd::oracle::{Oracle, OracleDecision, OracleError, OracleHints};
use stylistd::orchestrator::Orchestrator;
use stylistd::sessions::SessionStore;

// ============================================================================
// Fakes
// ============================================================================

/// Catalog keyed by subcategory. Unknown subcategories return nothing.
#[derive(Default)]
struct FakeCatalog {
    pools: Mutex<HashMap<u32, Vec<RawCatalogItem>>>,
    failing: HashSet<u32>,
    calls: AtomicUsize,
    queries: Mutex<Vec<CatalogQuery>>,
}

impl FakeCatalog {
    fn with_pool(self, slot: Slot, ids: &[&str]) -> Self {
        self.set_pool(slot, ids);
        self
    }

    fn failing_for(mut self, slot: Slot) -> Self {
        self.failing.insert(slot.subcategory_id().unwrap());
        self
    }

    fn set_pool(&self, slot: Slot, ids: &[&str]) {
        let records = ids
            .iter()
            .map(|id| serde_json::from_value(json!({ "id": id, "itemType": "Asset" })).unwrap())
            .collect();
        self.pools
            .lock()
            .unwrap()
            .insert(slot.subcategory_id().unwrap(), records);
    }

    /// Every fillable base slot gets a pool of `n` items
    fn stocked(n: usize) -> Self {
        let catalog = FakeCatalog::default();
        for slot in Slot::ALL {
            let ids: Vec<String> = (0..n).map(|i| format!("{}-{}", slot.label(), i)).collect();
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            catalog.set_pool(slot, &refs);
        }
        catalog
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogLookup for FakeCatalog {
    async fn search(&self, query: &CatalogQuery) -> Result<Vec<RawCatalogItem>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        let sub = query.subcategory.unwrap_or_default();
        if self.failing.contains(&sub) {
            return Err(CatalogError::Exhausted {
                attempts: 3,
                last: Box::new(CatalogError::Timeout),
            });
        }
        Ok(self.pools.lock().unwrap().get(&sub).cloned().unwrap_or_default())
    }
}

struct FakeOracle {
    decision: Result<OracleDecision, OracleError>,
    calls: AtomicUsize,
}

impl FakeOracle {
    fn new(decision: Result<OracleDecision, OracleError>) -> Self {
        Self {
            decision,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Oracle for FakeOracle {
    async fn interpret(
        &self,
        _text: &str,
        _hints: &OracleHints,
    ) -> Result<OracleDecision, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.decision.clone()
    }
}

fn orchestrator(catalog: Arc<FakeCatalog>) -> Orchestrator {
    Orchestrator::new(catalog, Arc::new(SessionStore::new()))
}

fn slots(outfit: &[stylist_common::CatalogItem]) -> Vec<Slot> {
    outfit.iter().map(|i| i.slot).collect()
}

// ============================================================================
// Clarify and greet
// ============================================================================

#[tokio::test]
async fn test_random_text_clarifies_without_lookups() {
    let catalog = Arc::new(FakeCatalog::stocked(3));
    let orch = orchestrator(catalog.clone());

    let resp = orch.handle_turn("asdf qwerty", UserId::Number(1)).await;
    assert_eq!(resp.action, TurnAction::Clarify);
    assert!(resp.outfit.is_empty());
    assert_eq!(catalog.calls(), 0);

    let session = orch.sessions().snapshot(&UserId::Number(1)).await.unwrap();
    assert!(session.is_empty());
}

#[tokio::test]
async fn test_greeting_makes_no_calls() {
    let catalog = Arc::new(FakeCatalog::stocked(3));
    let orch = orchestrator(catalog.clone());

    let resp = orch.handle_turn("hey!", UserId::Number(1)).await;
    assert_eq!(resp.action, TurnAction::Greet);
    assert!(resp.success);
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_more_without_history() {
    let orch = orchestrator(Arc::new(FakeCatalog::stocked(3)));
    let resp = orch.handle_turn("more", UserId::Number(9)).await;
    assert_eq!(resp.action, TurnAction::Clarify);
    assert!(resp.reply.contains("haven't made any suggestions yet"));
}

#[tokio::test]
async fn test_generic_or_price_only_text_clarifies_on_fresh_session() {
    let catalog = Arc::new(FakeCatalog::stocked(3));
    let orch = orchestrator(catalog.clone());

    for text in ["cool outfit", "something under 300"] {
        let resp = orch.handle_turn(text, UserId::Number(30)).await;
        assert_eq!(resp.action, TurnAction::Clarify, "{:?}", text);
        assert!(resp.outfit.is_empty());
    }
    assert_eq!(catalog.calls(), 0);
    let session = orch.sessions().snapshot(&UserId::Number(30)).await.unwrap();
    assert!(session.is_empty());
}

#[tokio::test]
async fn test_greeting_word_in_request_still_searches() {
    let catalog = Arc::new(FakeCatalog::stocked(2));
    let orch = orchestrator(catalog.clone());

    let resp = orch.handle_turn("formal evening outfit", UserId::Number(31)).await;
    assert_eq!(resp.action, TurnAction::NewOutfit);
    assert!(slots(&resp.outfit).contains(&Slot::NeckAccessory));
    assert_eq!(catalog.calls(), 4);
}

// ============================================================================
// New outfit
// ============================================================================

#[tokio::test]
async fn test_new_outfit_fills_planned_slots() {
    let catalog = Arc::new(FakeCatalog::stocked(4));
    let orch = orchestrator(catalog.clone());

    let resp = orch.handle_turn("knight outfit under 800", UserId::Number(1)).await;
    assert!(resp.success);
    assert_eq!(resp.action, TurnAction::NewOutfit);
    assert_eq!(
        slots(&resp.outfit),
        vec![
            Slot::Head,
            Slot::Shirt,
            Slot::Pants,
            Slot::BackAccessory,
            Slot::FrontAccessory
        ]
    );
    assert_eq!(resp.outfit[0].asset_id, "head-0");
    assert_eq!(catalog.calls(), 5);

    // Every lookup carried the shared filters and the fixed limit
    let queries = catalog.queries.lock().unwrap();
    assert!(queries.iter().all(|q| q.params.max_price == Some(800)));
    assert!(queries
        .iter()
        .all(|q| q.to_pairs().contains(&("Limit", "10".to_string()))));
}

#[tokio::test]
async fn test_one_failing_slot_does_not_abort_plan() {
    let catalog = Arc::new(
        FakeCatalog::default()
            .with_pool(Slot::Head, &["h1"])
            .with_pool(Slot::Pants, &["p1"])
            .failing_for(Slot::Shirt),
    );
    let orch = orchestrator(catalog);

    let resp = orch.handle_turn("casual outfit", UserId::Number(2)).await;
    assert!(resp.success);
    assert_eq!(slots(&resp.outfit), vec![Slot::Head, Slot::Pants]);
}

#[tokio::test]
async fn test_all_lookups_failing_reports_failure() {
    let catalog = Arc::new(
        FakeCatalog::default()
            .failing_for(Slot::Head)
            .failing_for(Slot::Shirt)
            .failing_for(Slot::Pants),
    );
    let orch = orchestrator(catalog);

    let resp = orch.handle_turn("casual outfit", UserId::Number(3)).await;
    assert!(!resp.success);
    assert_eq!(resp.action, TurnAction::NewOutfit);
    assert!(resp.outfit.is_empty());
}

#[tokio::test]
async fn test_failed_slot_keeps_prior_selection() {
    let catalog = Arc::new(FakeCatalog::stocked(2));
    let orch = orchestrator(catalog.clone());
    orch.handle_turn("casual outfit", UserId::Number(4)).await;

    catalog.set_pool(Slot::Shirt, &[]);
    let resp = orch.handle_turn("simple look", UserId::Number(4)).await;
    let shirt = resp.outfit.iter().find(|i| i.slot == Slot::Shirt).unwrap();
    assert_eq!(shirt.asset_id, "shirt-0");
}

// ============================================================================
// Replace and show more
// ============================================================================

#[tokio::test]
async fn test_change_my_hat() {
    let catalog = Arc::new(FakeCatalog::stocked(3));
    let orch = orchestrator(catalog.clone());
    orch.handle_turn("casual outfit", UserId::Number(5)).await;
    let before = catalog.calls();

    catalog.set_pool(Slot::Head, &["fresh-hat", "other-hat"]);
    let resp = orch.handle_turn("change my hat", UserId::Number(5)).await;

    assert_eq!(resp.action, TurnAction::Replace);
    assert!(resp.success);
    assert!(resp.reply.contains("head"));
    assert_eq!(catalog.calls() - before, 1);
    let head = resp.outfit.iter().find(|i| i.slot == Slot::Head).unwrap();
    assert_eq!(head.asset_id, "fresh-hat");
    assert_eq!(resp.outfit.len(), 3);
}

#[tokio::test]
async fn test_replace_that_mentions_the_outfit_touches_one_slot() {
    let catalog = Arc::new(FakeCatalog::stocked(3));
    let orch = orchestrator(catalog.clone());
    orch.handle_turn("knight outfit", UserId::Number(32)).await;
    let before = catalog.calls();

    catalog.set_pool(Slot::Head, &["plumed-helm"]);
    let resp = orch
        .handle_turn("change the hat on my outfit", UserId::Number(32))
        .await;
    assert_eq!(resp.action, TurnAction::Replace);
    assert_eq!(catalog.calls() - before, 1);

    let head = resp.outfit.iter().find(|i| i.slot == Slot::Head).unwrap();
    assert_eq!(head.asset_id, "plumed-helm");
    let shirt = resp.outfit.iter().find(|i| i.slot == Slot::Shirt).unwrap();
    assert_eq!(shirt.asset_id, "shirt-0");
}

#[tokio::test]
async fn test_ambiguous_replace_clarifies() {
    let catalog = Arc::new(FakeCatalog::stocked(3));
    let orch = orchestrator(catalog.clone());
    let resp = orch.handle_turn("swap my hat and pants", UserId::Number(6)).await;
    assert_eq!(resp.action, TurnAction::Clarify);
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn test_show_more_rotates_with_stored_params() {
    let catalog = Arc::new(FakeCatalog::stocked(3));
    let orch = orchestrator(catalog.clone());
    orch.handle_turn("formal outfit under 250", UserId::Number(7)).await;

    let mut seen = Vec::new();
    for _ in 0..3 {
        let resp = orch.handle_turn("more necklaces", UserId::Number(7)).await;
        assert_eq!(resp.action, TurnAction::ShowMore);
        let neck = resp
            .outfit
            .iter()
            .find(|i| i.slot == Slot::NeckAccessory)
            .unwrap();
        seen.push(neck.asset_id.clone());
    }
    assert_eq!(seen, vec!["neck accessory-1", "neck accessory-2", "neck accessory-0"]);

    // Show more re-queried with the params stored by the first turn
    let queries = catalog.queries.lock().unwrap();
    let last = queries.last().unwrap();
    assert_eq!(last.subcategory, Some(22));
    assert_eq!(last.params.max_price, Some(250));
}

#[tokio::test]
async fn test_show_more_on_unfilled_slot_lists_filled() {
    let orch = orchestrator(Arc::new(FakeCatalog::stocked(3)));
    orch.handle_turn("casual outfit", UserId::Number(8)).await;
    let resp = orch.handle_turn("more wings", UserId::Number(8)).await;
    assert_eq!(resp.action, TurnAction::Clarify);
    assert!(resp.reply.contains("head, shirt or pants"));
}

// ============================================================================
// Oracle
// ============================================================================

#[tokio::test]
async fn test_oracle_theme_replans() {
    let catalog = Arc::new(FakeCatalog::stocked(2));
    let oracle = Arc::new(FakeOracle::new(Ok(OracleDecision::Search {
        theme: "ninja under 300".to_string(),
    })));
    let orch = orchestrator(catalog).with_oracle(oracle.clone());

    let resp = orch.handle_turn("sneaky vibes please", UserId::Number(10)).await;
    assert_eq!(resp.action, TurnAction::NewOutfit);
    assert!(slots(&resp.outfit).contains(&Slot::FaceAccessory));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_oracle_theme_keeps_the_users_price() {
    let catalog = Arc::new(FakeCatalog::stocked(2));
    let oracle = Arc::new(FakeOracle::new(Ok(OracleDecision::Search {
        theme: "ninja".to_string(),
    })));
    let orch = orchestrator(catalog.clone()).with_oracle(oracle.clone());

    let resp = orch
        .handle_turn("something sneaky under 300", UserId::Number(33))
        .await;
    assert_eq!(resp.action, TurnAction::NewOutfit);
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);

    let queries = catalog.queries.lock().unwrap();
    assert_eq!(queries.len(), 5);
    assert!(queries.iter().all(|q| q.params.max_price == Some(300)));
    assert!(queries.iter().all(|q| q.params.genre_id == Some(4)));
}

#[tokio::test]
async fn test_oracle_clarify_passes_through() {
    let oracle = Arc::new(FakeOracle::new(Ok(OracleDecision::Clarify {
        reply: "Spooky or cute?".to_string(),
    })));
    let orch = orchestrator(Arc::new(FakeCatalog::stocked(2))).with_oracle(oracle);
    let resp = orch.handle_turn("blorp", UserId::Number(11)).await;
    assert_eq!(resp.action, TurnAction::Clarify);
    assert_eq!(resp.reply, "Spooky or cute?");
}

#[tokio::test]
async fn test_oracle_failure_falls_back() {
    let oracle = Arc::new(FakeOracle::new(Err(OracleError::Timeout(10))));
    let orch = orchestrator(Arc::new(FakeCatalog::stocked(2))).with_oracle(oracle.clone());

    let resp = orch.handle_turn("blorp", UserId::Number(12)).await;
    assert_eq!(resp.action, TurnAction::Clarify);
    assert!(resp.success);

    // Planner found intent, so the oracle is not consulted
    orch.handle_turn("knight outfit", UserId::Number(12)).await;
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Boundary and concurrency
// ============================================================================

#[tokio::test]
async fn test_oversized_prompt_gets_apology() {
    let orch = orchestrator(Arc::new(FakeCatalog::stocked(2)));
    let resp = orch
        .handle_turn(&"knight ".repeat(1_000), UserId::Number(13))
        .await;
    assert!(!resp.success);
    assert!(resp.outfit.is_empty());
    assert_eq!(resp.action, TurnAction::Error);
    assert!(resp.reply.starts_with("I'm sorry"));
}

#[tokio::test]
async fn test_concurrent_turns_for_one_user_are_serialized() {
    let catalog = Arc::new(FakeCatalog::stocked(5));
    let orch = Arc::new(orchestrator(catalog));
    orch.handle_turn("formal outfit", UserId::Number(14)).await;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let orch = orch.clone();
        handles.push(tokio::spawn(async move {
            orch.handle_turn("next necklace", UserId::Number(14)).await
        }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap().action, TurnAction::ShowMore);
    }

    // Four serialized rotations over a pool of five land on index 4
    let session = orch.sessions().snapshot(&UserId::Number(14)).await.unwrap();
    let sel = session.selection(Slot::NeckAccessory).unwrap();
    assert_eq!(sel.last_shown_index, 4);
    assert_eq!(sel.asset_id, "neck accessory-4");
}

#[tokio::test]
async fn test_users_do_not_share_outfits() {
    let orch = orchestrator(Arc::new(FakeCatalog::stocked(2)));
    orch.handle_turn("casual outfit", UserId::Number(20)).await;
    let other = orch.outfit(UserId::Number(21)).await;
    assert!(other.outfit.is_empty());
    let mine = orch.outfit(UserId::from("20")).await;
    assert_eq!(mine.outfit.len(), 3);
}

#[tokio::test]
async fn test_search_is_ranked_and_sessionless() {
    let orch = orchestrator(Arc::new(FakeCatalog::stocked(4)));
    let resp = orch.search("knight outfit", Some(7)).await;
    assert!(resp.success);
    assert_eq!(resp.items.len(), 7);
    // One per slot before any repeats
    let first_five: HashSet<Slot> = resp.items[..5].iter().map(|i| i.slot).collect();
    assert_eq!(first_five.len(), 5);
    assert!(orch.sessions().is_empty().await);
}

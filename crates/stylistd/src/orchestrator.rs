//! Conversation turn handler.
//!
//! classify -> plan -> catalog lookups (concurrent) -> map -> session update
//! -> templated reply. Any internal failure becomes an apology with
//! `success=false` and an empty outfit.

use std::sync::Arc;
use stylist_common::error::Result;
use stylist_common::intent::{classify, ClarifyReason, TurnIntent};
use stylist_common::planner::{plan_params, plan_steps, PlanStep};
use stylist_common::ranker::{diversify, DEFAULT_RANKED_ITEMS};
use stylist_common::{
    detect_filters, map_items, reply, CatalogItem, CatalogQuery, OutfitResponse, OutfitSession, SearchResponse,
    Slot, StepOutcome, StylistError, TurnAction, TurnResponse, UserId,
};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::catalog::CatalogLookup;
use crate::metrics::StylistMetrics;
use crate::oracle::{Oracle, OracleDecision, OracleHints};
use crate::sessions::SessionStore;

/// Longest prompt accepted for one turn
pub const MAX_PROMPT_CHARS: usize = 2_000;

pub struct Orchestrator {
    catalog: Arc<dyn CatalogLookup>,
    oracle: Option<Arc<dyn Oracle>>,
    sessions: Arc<SessionStore>,
    metrics: Option<Arc<StylistMetrics>>,
}

impl Orchestrator {
    pub fn new(catalog: Arc<dyn CatalogLookup>, sessions: Arc<SessionStore>) -> Self {
        Self {
            catalog,
            oracle: None,
            sessions,
            metrics: None,
        }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<StylistMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Handle one turn. Never fails: errors become an apology.
    pub async fn handle_turn(&self, text: &str, user_id: UserId) -> TurnResponse {
        let response = match self.try_turn(text, &user_id).await {
            Ok(response) => response,
            Err(e) => {
                error!("Turn failed for user {} (code {}): {}", user_id, e.code(), e);
                TurnResponse::failure(user_id, reply::APOLOGY)
            }
        };
        if let Some(ref metrics) = self.metrics {
            metrics.record_turn(response.action.as_str());
        }
        response
    }

    async fn try_turn(&self, text: &str, user_id: &UserId) -> Result<TurnResponse> {
        if text.chars().count() > MAX_PROMPT_CHARS {
            return Err(StylistError::InvalidRequest(format!(
                "prompt longer than {} characters",
                MAX_PROMPT_CHARS
            )));
        }

        let handle = self.sessions.get_or_create(user_id).await;
        if let Some(ref metrics) = self.metrics {
            metrics.set_active_sessions(self.sessions.len().await);
        }

        // Held until the reply is built: one turn per user at a time
        let mut session = handle.lock().await;
        let intent = classify(text, &session);
        info!("user={} intent={:?}", user_id, intent);

        let turn = Turn {
            user_id: user_id.clone(),
        };

        let response = match intent {
            TurnIntent::Greet => turn.reply(TurnAction::Greet, true, reply::GREETING, &session),
            TurnIntent::Clarify(reason) => turn.clarify(&reason, &session),
            TurnIntent::Replace(slot) => {
                let plan = plan_steps(text, Some(slot));
                let outcomes = self.execute(plan).await;
                let report = match outcomes.first() {
                    Some(outcome) => session.apply_replace(&outcome.step, &outcome.items),
                    None => Default::default(),
                };
                let ok = report.succeeded();
                turn.reply(TurnAction::Replace, ok, &reply::replace(slot, ok), &session)
            }
            TurnIntent::ShowMore(slot) => {
                let params = session
                    .params_for(slot)
                    .cloned()
                    .ok_or_else(|| StylistError::Session(format!("no stored params for {}", slot)))?;
                let outcomes = self.execute(vec![PlanStep { slot, params }]).await;
                let items = outcomes.into_iter().next().map(|o| o.items).unwrap_or_default();
                let report = session.apply_show_more(slot, &items);
                debug!("{} is {:?} after show more", slot, session.phase(slot));
                let ok = report.succeeded();
                let wrapped = ok
                    && session
                        .selection(slot)
                        .is_some_and(|sel| sel.last_shown_index == 0);
                turn.reply(
                    TurnAction::ShowMore,
                    ok,
                    &reply::show_more(slot, ok, wrapped),
                    &session,
                )
            }
            TurnIntent::NewOutfit => self.new_outfit(text, &turn, &mut session).await,
        };

        Ok(response)
    }

    async fn new_outfit(&self, text: &str, turn: &Turn, session: &mut OutfitSession) -> TurnResponse {
        let mut plan = plan_steps(text, None);

        if plan.is_empty() {
            match self.consult_oracle(text, session).await {
                Some(OracleDecision::Search { theme }) => {
                    info!("Oracle suggested theme {:?}", theme);
                    // Constraints the user stated win over the oracle's wording
                    let stated = detect_filters(text);
                    plan = plan_steps(&theme, None)
                        .into_iter()
                        .map(|step| PlanStep {
                            slot: step.slot,
                            params: step.params.overlay(&stated),
                        })
                        .collect();
                }
                Some(OracleDecision::Clarify { reply }) => {
                    return turn.reply(TurnAction::Clarify, true, &reply, session);
                }
                None => {}
            }
        }

        if plan.is_empty() {
            return turn.clarify(&ClarifyReason::NoIntent, session);
        }

        let outcomes = self.execute(plan).await;
        let report = session.apply_new_outfit(&outcomes);
        for slot in &report.missed {
            info!("No candidates for {} this turn, keeping prior state", slot);
        }
        let outfit_size = session.filled_slots().len();
        turn.reply(
            TurnAction::NewOutfit,
            report.succeeded(),
            &reply::new_outfit(report.updated.len(), outfit_size),
            session,
        )
    }

    /// Ask the oracle, swallowing every failure
    async fn consult_oracle(&self, text: &str, session: &OutfitSession) -> Option<OracleDecision> {
        let oracle = self.oracle.as_ref()?;
        let hints = OracleHints {
            filled_slots: session.filled_slots(),
        };
        match oracle.interpret(text, &hints).await {
            Ok(decision) => {
                self.record_oracle("ok");
                Some(decision)
            }
            Err(e) => {
                self.record_oracle(e.kind());
                debug!("Oracle unavailable, using deterministic path: {}", e);
                None
            }
        }
    }

    fn record_oracle(&self, result: &str) {
        if let Some(ref metrics) = self.metrics {
            metrics.record_oracle(result);
        }
    }

    /// Run every step concurrently. Results come back in plan order; a failed
    /// step yields an empty pool.
    async fn execute(&self, plan: Vec<PlanStep>) -> Vec<StepOutcome> {
        let mut pools: Vec<Vec<CatalogItem>> = vec![Vec::new(); plan.len()];
        let mut join_set = JoinSet::new();

        for (index, step) in plan.iter().enumerate() {
            let catalog = self.catalog.clone();
            let slot = step.slot;
            let query = CatalogQuery::for_slot(slot, &step.params);
            join_set.spawn(async move {
                let items = match catalog.search(&query).await {
                    Ok(raw) => map_items(&raw, (slot != Slot::Unknown).then_some(slot)),
                    Err(e) => {
                        warn!("Lookup for {} failed: {}", slot, e);
                        Vec::new()
                    }
                };
                (index, items)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, items)) => pools[index] = items,
                Err(e) => {
                    let err = StylistError::Catalog(format!("lookup task aborted: {}", e));
                    error!("{} (code {})", err, err.code());
                }
            }
        }

        plan.into_iter()
            .zip(pools)
            .map(|(step, items)| StepOutcome::new(step, items))
            .collect()
    }

    /// One-shot ranked search that never touches a session
    pub async fn search(&self, prompt: &str, limit: Option<usize>) -> SearchResponse {
        let params = plan_params(prompt);
        let mut plan = plan_steps(prompt, None);
        if plan.is_empty() && !params.is_empty() {
            plan = vec![PlanStep {
                slot: Slot::Unknown,
                params: params.clone(),
            }];
        }

        let items: Vec<CatalogItem> = self
            .execute(plan)
            .await
            .into_iter()
            .flat_map(|o| o.items)
            .collect();
        let ranked = diversify(&items, limit.unwrap_or(DEFAULT_RANKED_ITEMS));

        SearchResponse {
            success: !ranked.is_empty(),
            params,
            items: ranked,
        }
    }

    /// Read-only view of a user's outfit
    pub async fn outfit(&self, user_id: UserId) -> OutfitResponse {
        let outfit = self
            .sessions
            .snapshot(&user_id)
            .await
            .map(|s| s.current_outfit())
            .unwrap_or_default();
        OutfitResponse { user_id, outfit }
    }
}

/// Per-turn response builder
struct Turn {
    user_id: UserId,
}

impl Turn {
    fn reply(
        &self,
        action: TurnAction,
        success: bool,
        text: &str,
        session: &OutfitSession,
    ) -> TurnResponse {
        TurnResponse {
            success,
            user_id: self.user_id.clone(),
            action,
            reply: text.to_string(),
            outfit: session.current_outfit(),
        }
    }

    fn clarify(&self, reason: &ClarifyReason, session: &OutfitSession) -> TurnResponse {
        self.reply(TurnAction::Clarify, true, &reply::clarify(reason), session)
    }
}

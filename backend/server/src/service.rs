//! Ranked listing and vote application.
//!
//! # Consistency
//! A listing reads the catalog, then every score in one batch. Votes landing
//! between those two reads show up in the result; nothing here makes the two
//! reads transactional, and nothing is cached between listings.
//!
//! # Referential integrity
//! Votes are not checked against the catalog. Voting on an unknown id creates
//! a ledger entry for it.
use std::sync::Arc;

use tracing::info;

use crate::{
    catalog::TipCatalog,
    config::Config,
    database::Store,
    error::Result,
    ledger::VoteLedger,
    models::{Direction, RankedTip, TipId, VoteRequest},
};

pub struct TipService {
    catalog: TipCatalog,
    ledger: VoteLedger,
}

impl TipService {
    pub fn new(catalog: TipCatalog, ledger: VoteLedger) -> Self {
        Self { catalog, ledger }
    }

    pub fn from_config(store: Arc<dyn Store>, config: &Config) -> Self {
        Self::new(
            TipCatalog::new(store.clone(), &config.tips_key, config.catalog_layout),
            VoteLedger::new(store, &config.votes_key),
        )
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// Tips by descending score, ties kept in catalog order.
    pub async fn get_ranked_tips(&self) -> Result<Vec<RankedTip>> {
        let tips = self.catalog.list_tips().await?;
        let ids: Vec<TipId> = tips.iter().map(|tip| tip.id).collect();
        let tallies = self.ledger.get_tallies(&ids).await?;

        let mut ranked: Vec<RankedTip> = tips
            .into_iter()
            .zip(tallies)
            .map(|(tip, tally)| RankedTip::new(tip, tally))
            .collect();

        // stable: equal scores stay in catalog order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        Ok(ranked)
    }

    /// Applies one vote and returns the new score.
    pub async fn apply_vote(&self, tip_id: TipId, direction: Direction) -> Result<i64> {
        let score = self.ledger.adjust_score(tip_id, direction.delta()).await?;
        info!("Vote {direction:?} on tip {tip_id}, score now {score}");

        Ok(score)
    }

    pub async fn apply_request(&self, request: VoteRequest) -> Result<i64> {
        self.apply_vote(request.tip_id, request.direction).await
    }
}

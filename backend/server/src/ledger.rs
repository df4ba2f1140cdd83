//! Vote ledger.
//!
//! One signed counter per tip id. Counters start at 0, have no floor or ceiling
//! and are never deleted. Every change is one atomic increment in the store.
use std::sync::Arc;

use crate::{
    database::Store,
    error::Result,
    models::{TipId, VoteTally},
};

pub struct VoteLedger {
    store: Arc<dyn Store>,
    key: String,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn Store>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub async fn get_score(&self, tip_id: TipId) -> Result<i64> {
        Ok(self.store.hash_get(&self.key, tip_id).await?.unwrap_or(0))
    }

    /// Tallies for every id in one round trip, in the same order as `tip_ids`.
    pub async fn get_tallies(&self, tip_ids: &[TipId]) -> Result<Vec<VoteTally>> {
        if tip_ids.is_empty() {
            return Ok(Vec::new());
        }

        let scores = self.store.hash_get_many(&self.key, tip_ids).await?;

        Ok(tip_ids
            .iter()
            .zip(scores)
            .map(|(&tip_id, score)| VoteTally {
                tip_id,
                score: score.unwrap_or(0),
            })
            .collect())
    }

    /// Adds `delta` and returns the new score.
    pub async fn adjust_score(&self, tip_id: TipId, delta: i64) -> Result<i64> {
        self.store.hash_incr_by(&self.key, tip_id, delta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, memory::MemoryStore};

    fn ledger() -> (Arc<MemoryStore>, VoteLedger) {
        let store = Arc::new(MemoryStore::new());
        let ledger = VoteLedger::new(store.clone(), "protip_votes");

        (store, ledger)
    }

    #[tokio::test]
    async fn test_absent_is_zero() {
        let (_, ledger) = ledger();

        assert_eq!(ledger.get_score(9).await.unwrap(), 0);
        assert_eq!(
            ledger.get_tallies(&[9]).await.unwrap(),
            vec![VoteTally { tip_id: 9, score: 0 }]
        );
        assert!(ledger.get_tallies(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjust_returns_new_score() {
        let (_, ledger) = ledger();

        assert_eq!(ledger.adjust_score(0, -1).await.unwrap(), -1);
        assert_eq!(ledger.adjust_score(0, -1).await.unwrap(), -2);
        assert_eq!(ledger.adjust_score(1, 1).await.unwrap(), 1);
        assert_eq!(ledger.get_score(0).await.unwrap(), -2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adjustments() {
        let (_, ledger) = ledger();
        let ledger = Arc::new(ledger);

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let ledger = ledger.clone();
                let delta = if i % 3 == 0 { -1 } else { 1 };
                tokio::spawn(async move { ledger.adjust_score(5, delta).await.map(|_| delta) })
            })
            .collect();

        let mut expected = 0;
        for handle in handles {
            expected += handle.await.unwrap().unwrap();
        }

        assert_eq!(ledger.get_score(5).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let (store, ledger) = ledger();
        ledger.adjust_score(0, 1).await.unwrap();
        store.set_available(false);

        assert!(matches!(ledger.get_score(0).await, Err(AppError::StoreUnavailable(_))));
        assert!(matches!(ledger.get_tallies(&[0]).await, Err(AppError::StoreUnavailable(_))));
        assert!(matches!(ledger.adjust_score(0, 1).await, Err(AppError::StoreUnavailable(_))));

        store.set_available(true);
        assert_eq!(ledger.get_score(0).await.unwrap(), 1);
    }
}

//! Tip catalog.
//!
//! Tip ids are not stored. Each read assigns id N to the Nth element of the
//! catalog reply, so ids are only as stable as the store's ordering.
use std::sync::Arc;

use crate::{
    config::CatalogLayout,
    database::Store,
    error::Result,
    models::{Tip, TipId},
};

pub struct TipCatalog {
    store: Arc<dyn Store>,
    key: String,
    layout: CatalogLayout,
}

impl TipCatalog {
    pub fn new(store: Arc<dyn Store>, key: impl Into<String>, layout: CatalogLayout) -> Self {
        Self {
            store,
            key: key.into(),
            layout,
        }
    }

    /// Reads the whole catalog in one round trip.
    pub async fn list_tips(&self) -> Result<Vec<Tip>> {
        let texts = match self.layout {
            CatalogLayout::List => self.store.list_range(&self.key).await?,
            CatalogLayout::Set => self.store.set_members(&self.key).await?,
        };

        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| Tip {
                id: position as TipId,
                text,
            })
            .collect())
    }
}

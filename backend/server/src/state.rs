use std::sync::Arc;

use crate::{
    config::Config,
    database::{Store, init_store},
    error::Result,
    service::TipService,
};

pub struct State {
    pub config: Config,
    pub service: TipService,
}

impl State {
    pub fn new() -> Result<Arc<Self>> {
        let config = Config::load()?;
        let store = init_store(&config)?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        let service = TipService::from_config(store, &config);

        Arc::new(Self { config, service })
    }
}

use std::sync::Arc;

use crate::config::Config;
use crate::interview::{AnswerEvaluator, FixedAnswerEvaluator};
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable document store. Default: InMemoryStore; Postgres when DATABASE_URL is set.
    pub store: Arc<dyn DocumentStore>,
    /// Pluggable answer scorer. Default: FixedAnswerEvaluator.
    pub evaluator: Arc<dyn AnswerEvaluator>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        AppState {
            store,
            evaluator: Arc::new(FixedAnswerEvaluator),
            config,
        }
    }

    /// State backed by a fresh in-memory store.
    #[cfg(test)]
    pub fn in_memory(config: Config) -> Self {
        Self::new(Arc::new(crate::store::InMemoryStore::new()), config)
    }
}

//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::counter::{HitCounter, RetryPolicy};
use crate::store::CounterStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// `counter` is `None` when the hit counter is disabled, in which case the
/// home page serves the static greeting.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub counter: Option<HitCounter>,
}

impl AppState {
    /// Creates application state, wiring the given store into a hit counter
    /// if the counter is enabled in `config`.
    pub fn new(config: AppConfig, store: Arc<dyn CounterStore>) -> Self {
        let counter = config.counter.enabled.then(|| {
            HitCounter::new(
                store,
                config.counter.key.clone(),
                RetryPolicy::from_config(&config.counter),
            )
        });
        Self {
            config: Arc::new(config),
            counter,
        }
    }

    /// Creates application state that never touches a counter store.
    pub fn without_counter(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            counter: None,
        }
    }
}

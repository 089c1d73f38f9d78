//! hello-counter: a greeting web service that counts its visitors.
//!
//! `GET /` answers with a greeting and the number of times it has been
//! served, kept in Redis; `GET /health` is a liveness probe.

pub mod config;
pub mod counter;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use counter::{CounterError, HitCounter, RetryPolicy};
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
pub use store::{CounterStore, RedisStore};

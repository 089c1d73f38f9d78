//! Greeting page handler.

use axum::extract::State;

use crate::error::AppError;
use crate::state::AppState;

/// Greeting served when the hit counter is disabled
pub const GREETING: &str = "Hello! CI/CD와 Docker 체험 성공입니다! 수정수정 이렇게 !";

/// Greeting carrying the visit count.
pub fn greeting_with_count(count: i64) -> String {
    format!("Hello! This page has been viewed {count} times.")
}

/// Greeting page handler.
///
/// Each request increments the hit counter and reports the new value. Counter
/// failures (after retries) are returned as errors and become a 500.
pub async fn index(State(state): State<AppState>) -> Result<String, AppError> {
    match &state.counter {
        Some(counter) => {
            let count = counter.increment_and_get().await?;
            Ok(greeting_with_count(count))
        }
        None => Ok(GREETING.to_string()),
    }
}

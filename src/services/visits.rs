//! Per-session visit counter

use std::sync::Arc;

use serde_json::json;

use crate::error::AppResult;

use super::sessions::{SessionId, SessionStore};

/// Session key holding the number of home page visits
pub const NUM_VISITS_KEY: &str = "num_visits";

#[derive(Clone)]
pub struct VisitCounter {
    sessions: Arc<dyn SessionStore>,
}

impl VisitCounter {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Record a visit and return how many visits preceded it.
    ///
    /// Read then write: concurrent requests in one session may lose an
    /// increment.
    pub async fn increment(&self, session: &SessionId) -> AppResult<i64> {
        let visits = self
            .sessions
            .get(session, NUM_VISITS_KEY)
            .await?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);

        self.sessions
            .set(session, NUM_VISITS_KEY, json!(visits.saturating_add(1)))
            .await?;

        Ok(visits)
    }
}

use std::sync::LazyLock;
use std::time::Duration;

use moka::future::Cache;
use nutype::nutype;
use regex::Regex;
use storyflow_common::{SubmissionId, UserId};
use tracing::debug;

use crate::domain::workflow::TransitionOutcome;

static IDEMPOTENCY_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_.:-]+$").unwrap());

/// Client supplied token that makes a retried transition a no-op
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 128, regex = IDEMPOTENCY_KEY_REGEX),
    derive(Clone, Debug, Display, FromStr, AsRef, PartialEq, Eq, Hash)
)]
pub struct IdempotencyKey(String);

type CacheKey = (UserId, SubmissionId, IdempotencyKey);

/// Outcomes of recent transitions, keyed by who asked, for which submission,
/// under which key. Entries expire after the configured window.
#[derive(Clone)]
pub struct IdempotencyCache {
    outcomes: Cache<CacheKey, TransitionOutcome>,
}

impl IdempotencyCache {
    pub fn new(window: Duration, capacity: u64) -> Self {
        let outcomes = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(window)
            .build();
        Self { outcomes }
    }

    pub async fn get(
        &self,
        actor: UserId,
        submission_id: SubmissionId,
        key: &IdempotencyKey,
    ) -> Option<TransitionOutcome> {
        let cached = self
            .outcomes
            .get(&(actor, submission_id, key.clone()))
            .await;
        if cached.is_some() {
            debug!("idempotency hit for key {} on {}", key, submission_id);
        }
        cached
    }

    pub async fn insert(
        &self,
        actor: UserId,
        submission_id: SubmissionId,
        key: IdempotencyKey,
        outcome: TransitionOutcome,
    ) {
        self.outcomes
            .insert((actor, submission_id, key), outcome)
            .await;
    }
}

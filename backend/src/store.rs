use shared::models::*;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Failed to acquire store lock")]
    LockFailed,
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the pages and the vote endpoint read from or append to.
///
/// Lookups return `Ok(None)` for missing rows; the route layer decides what
/// a missing row means for the response.
#[rocket::async_trait]
pub trait ContentStore: Send + Sync {
    /// Archived events, newest first.
    async fn archived_events(&self) -> StoreResult<Vec<Event>>;
    /// Every non-draft event, newest first.
    async fn visible_events(&self) -> StoreResult<Vec<Event>>;
    async fn latest_visible_event(&self) -> StoreResult<Option<Event>>;
    async fn visible_event(&self, id: i32) -> StoreResult<Option<Event>>;
    /// Any event regardless of status.
    async fn event(&self, id: i32) -> StoreResult<Option<Event>>;
    async fn spotlight_event(&self) -> StoreResult<Option<Event>>;

    /// Active talks of an event ordered by position.
    async fn event_talks(&self, event_id: i32) -> StoreResult<Vec<Talk>>;
    async fn active_talk(&self, event_id: i32, slug: &str) -> StoreResult<Option<Talk>>;
    async fn talk(&self, id: i32) -> StoreResult<Option<Talk>>;

    async fn speakers(&self) -> StoreResult<Vec<Speaker>>;
    async fn speaker(&self, id: i32) -> StoreResult<Option<Speaker>>;
    async fn speaker_talks(&self, speaker_id: i32) -> StoreResult<Vec<Talk>>;

    async fn tutorials(&self) -> StoreResult<Vec<Tutorial>>;
    async fn tutorial(&self, id: i32) -> StoreResult<Option<Tutorial>>;

    async fn event_photos(&self, event_id: i32) -> StoreResult<Vec<Photo>>;
    async fn recent_photos(&self, limit: i64) -> StoreResult<Vec<Photo>>;

    async fn create_vote(&self, vote: &NewVote) -> StoreResult<Vote>;
    /// Active talks of an event with their vote counts, highest first.
    async fn vote_tally(&self, event_id: i32) -> StoreResult<Vec<TalkVotes>>;
}

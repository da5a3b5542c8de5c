use sqlx::PgPool;
use shared::models::*;
use crate::store::{ContentStore, StoreResult};

const EVENT_COLUMNS: &str = "id, name, description, starts_at, venue, status, votable, spotlight";
const TALK_COLUMNS: &str = "id, event_id, speaker_id, name, slug, description, slides_url, video_url, status, position";
const NEWEST_FIRST: &str = "ORDER BY starts_at DESC NULLS LAST, id DESC";

#[derive(sqlx::FromRow)]
struct TallyRow {
    #[sqlx(flatten)]
    talk: Talk,
    votes: i64,
}

/// Content store backed by the site's Postgres database.
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn events_where(&self, filter: &str) -> StoreResult<Vec<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE {filter} {NEWEST_FIRST}");
        Ok(sqlx::query_as::<_, Event>(&sql).fetch_all(&self.pool).await?)
    }

    async fn first_event_where(&self, filter: &str) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE {filter} {NEWEST_FIRST} LIMIT 1");
        Ok(sqlx::query_as::<_, Event>(&sql).fetch_optional(&self.pool).await?)
    }
}

#[rocket::async_trait]
impl ContentStore for PgContentStore {
    async fn archived_events(&self) -> StoreResult<Vec<Event>> {
        self.events_where("status = 'archived'").await
    }

    async fn visible_events(&self) -> StoreResult<Vec<Event>> {
        self.events_where("status <> 'draft'").await
    }

    async fn latest_visible_event(&self) -> StoreResult<Option<Event>> {
        self.first_event_where("status <> 'draft'").await
    }

    async fn visible_event(&self, id: i32) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND status <> 'draft'");
        Ok(sqlx::query_as::<_, Event>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn event(&self, id: i32) -> StoreResult<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        Ok(sqlx::query_as::<_, Event>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn spotlight_event(&self) -> StoreResult<Option<Event>> {
        self.first_event_where("spotlight AND status <> 'draft'").await
    }

    async fn event_talks(&self, event_id: i32) -> StoreResult<Vec<Talk>> {
        let sql = format!(
            "SELECT {TALK_COLUMNS} FROM talks
             WHERE event_id = $1 AND status = 'active'
             ORDER BY position, id"
        );
        Ok(sqlx::query_as::<_, Talk>(&sql).bind(event_id).fetch_all(&self.pool).await?)
    }

    async fn active_talk(&self, event_id: i32, slug: &str) -> StoreResult<Option<Talk>> {
        let sql = format!(
            "SELECT {TALK_COLUMNS} FROM talks
             WHERE event_id = $1 AND slug = $2 AND status = 'active'"
        );
        Ok(sqlx::query_as::<_, Talk>(&sql)
            .bind(event_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn talk(&self, id: i32) -> StoreResult<Option<Talk>> {
        let sql = format!("SELECT {TALK_COLUMNS} FROM talks WHERE id = $1");
        Ok(sqlx::query_as::<_, Talk>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn speakers(&self) -> StoreResult<Vec<Speaker>> {
        Ok(sqlx::query_as::<_, Speaker>(
            "SELECT id, name, slug, company, bio, photo_url FROM speakers ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn speaker(&self, id: i32) -> StoreResult<Option<Speaker>> {
        Ok(sqlx::query_as::<_, Speaker>(
            "SELECT id, name, slug, company, bio, photo_url FROM speakers WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn speaker_talks(&self, speaker_id: i32) -> StoreResult<Vec<Talk>> {
        let sql = format!(
            "SELECT {TALK_COLUMNS} FROM talks
             WHERE speaker_id = $1 AND status = 'active'
             ORDER BY event_id DESC, position"
        );
        Ok(sqlx::query_as::<_, Talk>(&sql).bind(speaker_id).fetch_all(&self.pool).await?)
    }

    async fn tutorials(&self) -> StoreResult<Vec<Tutorial>> {
        Ok(sqlx::query_as::<_, Tutorial>(
            "SELECT id, title, slug, description, content, created_at
             FROM tutorials ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn tutorial(&self, id: i32) -> StoreResult<Option<Tutorial>> {
        Ok(sqlx::query_as::<_, Tutorial>(
            "SELECT id, title, slug, description, content, created_at
             FROM tutorials WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn event_photos(&self, event_id: i32) -> StoreResult<Vec<Photo>> {
        Ok(sqlx::query_as::<_, Photo>(
            "SELECT id, event_id, url, caption FROM photos WHERE event_id = $1 ORDER BY id"
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn recent_photos(&self, limit: i64) -> StoreResult<Vec<Photo>> {
        Ok(sqlx::query_as::<_, Photo>(
            "SELECT id, event_id, url, caption FROM photos ORDER BY id DESC LIMIT $1"
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_vote(&self, vote: &NewVote) -> StoreResult<Vote> {
        Ok(sqlx::query_as::<_, Vote>(
            "INSERT INTO votes (talk_id, event_id, ip, user_agent)
             VALUES ($1, $2, $3, $4)
             RETURNING id, talk_id, event_id, ip, user_agent, created_at"
        )
        .bind(vote.talk_id)
        .bind(vote.event_id)
        .bind(&vote.ip)
        .bind(&vote.user_agent)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn vote_tally(&self, event_id: i32) -> StoreResult<Vec<TalkVotes>> {
        let sql = format!(
            "SELECT {}, COUNT(v.id) AS votes
             FROM talks t LEFT JOIN votes v ON v.talk_id = t.id
             WHERE t.event_id = $1 AND t.status = 'active'
             GROUP BY t.id
             ORDER BY votes DESC, t.position",
            TALK_COLUMNS.split(", ").map(|c| format!("t.{c}")).collect::<Vec<_>>().join(", ")
        );
        let rows = sqlx::query_as::<_, TallyRow>(&sql)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter()
            .map(|row| TalkVotes { talk: row.talk, votes: row.votes })
            .collect())
    }
}

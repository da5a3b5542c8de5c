use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;
use shared::{models::*, validation::is_valid_slug};
use crate::store::{ContentStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Tables {
    events: Vec<Event>,
    talks: Vec<Talk>,
    speakers: Vec<Speaker>,
    tutorials: Vec<Tutorial>,
    photos: Vec<Photo>,
    votes: Vec<Vote>,
}

/// In-process content store used by the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

fn newest_first(events: &mut [Event]) {
    events.sort_by_key(|e| Reverse((e.starts_at, e.id)));
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::LockFailed)
    }

    /// Makes every following write fail as a database error would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn add_event(&self, event: Event) -> StoreResult<()> {
        self.tables()?.events.push(event);
        Ok(())
    }

    pub fn add_talk(&self, talk: Talk) -> StoreResult<()> {
        if !is_valid_slug(&talk.slug) {
            return Err(StoreError::Database(format!("invalid talk slug {:?}", talk.slug)));
        }
        let mut tables = self.tables()?;
        if tables.talks.iter().any(|t| t.event_id == talk.event_id && t.slug == talk.slug) {
            return Err(StoreError::Database(format!(
                "duplicate slug {} in event {}", talk.slug, talk.event_id
            )));
        }
        tables.talks.push(talk);
        Ok(())
    }

    pub fn add_speaker(&self, speaker: Speaker) -> StoreResult<()> {
        self.tables()?.speakers.push(speaker);
        Ok(())
    }

    pub fn add_tutorial(&self, tutorial: Tutorial) -> StoreResult<()> {
        self.tables()?.tutorials.push(tutorial);
        Ok(())
    }

    pub fn add_photo(&self, photo: Photo) -> StoreResult<()> {
        self.tables()?.photos.push(photo);
        Ok(())
    }

    pub fn votes(&self) -> StoreResult<Vec<Vote>> {
        Ok(self.tables()?.votes.clone())
    }

    fn events_matching(&self, keep: impl Fn(&Event) -> bool) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self.tables()?.events.iter().filter(|e| keep(*e)).cloned().collect();
        newest_first(&mut events);
        Ok(events)
    }

    fn talks_matching(&self, keep: impl Fn(&Talk) -> bool) -> StoreResult<Vec<Talk>> {
        let mut talks: Vec<Talk> = self.tables()?.talks.iter().filter(|t| keep(*t)).cloned().collect();
        talks.sort_by_key(|t| (t.position, t.id));
        Ok(talks)
    }
}

#[rocket::async_trait]
impl ContentStore for MemoryStore {
    async fn archived_events(&self) -> StoreResult<Vec<Event>> {
        self.events_matching(Event::is_archived)
    }

    async fn visible_events(&self) -> StoreResult<Vec<Event>> {
        self.events_matching(Event::is_visible)
    }

    async fn latest_visible_event(&self) -> StoreResult<Option<Event>> {
        Ok(self.events_matching(Event::is_visible)?.into_iter().next())
    }

    async fn visible_event(&self, id: i32) -> StoreResult<Option<Event>> {
        Ok(self.events_matching(|e| e.id == id && e.is_visible())?.into_iter().next())
    }

    async fn event(&self, id: i32) -> StoreResult<Option<Event>> {
        Ok(self.tables()?.events.iter().find(|e| e.id == id).cloned())
    }

    async fn spotlight_event(&self) -> StoreResult<Option<Event>> {
        Ok(self.events_matching(|e| e.spotlight && e.is_visible())?.into_iter().next())
    }

    async fn event_talks(&self, event_id: i32) -> StoreResult<Vec<Talk>> {
        self.talks_matching(|t| t.event_id == event_id && t.is_active())
    }

    async fn active_talk(&self, event_id: i32, slug: &str) -> StoreResult<Option<Talk>> {
        Ok(self
            .talks_matching(|t| t.event_id == event_id && t.slug == slug && t.is_active())?
            .into_iter()
            .next())
    }

    async fn talk(&self, id: i32) -> StoreResult<Option<Talk>> {
        Ok(self.tables()?.talks.iter().find(|t| t.id == id).cloned())
    }

    async fn speakers(&self) -> StoreResult<Vec<Speaker>> {
        let mut speakers = self.tables()?.speakers.clone();
        speakers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(speakers)
    }

    async fn speaker(&self, id: i32) -> StoreResult<Option<Speaker>> {
        Ok(self.tables()?.speakers.iter().find(|s| s.id == id).cloned())
    }

    async fn speaker_talks(&self, speaker_id: i32) -> StoreResult<Vec<Talk>> {
        let mut talks = self.talks_matching(|t| t.speaker_id == speaker_id && t.is_active())?;
        talks.sort_by_key(|t| (Reverse(t.event_id), t.position));
        Ok(talks)
    }

    async fn tutorials(&self) -> StoreResult<Vec<Tutorial>> {
        let mut tutorials = self.tables()?.tutorials.clone();
        tutorials.sort_by_key(|t| Reverse(t.created_at));
        Ok(tutorials)
    }

    async fn tutorial(&self, id: i32) -> StoreResult<Option<Tutorial>> {
        Ok(self.tables()?.tutorials.iter().find(|t| t.id == id).cloned())
    }

    async fn event_photos(&self, event_id: i32) -> StoreResult<Vec<Photo>> {
        Ok(self.tables()?.photos.iter().filter(|p| p.event_id == Some(event_id)).cloned().collect())
    }

    async fn recent_photos(&self, limit: i64) -> StoreResult<Vec<Photo>> {
        let mut photos = self.tables()?.photos.clone();
        photos.sort_by_key(|p| Reverse(p.id));
        photos.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(photos)
    }

    async fn create_vote(&self, vote: &NewVote) -> StoreResult<Vote> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("writes are disabled".into()));
        }

        let mut tables = self.tables()?;
        let stored = Vote {
            id: tables.votes.len() as i64 + 1,
            talk_id: vote.talk_id,
            event_id: vote.event_id,
            ip: vote.ip.clone(),
            user_agent: vote.user_agent.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.votes.push(stored.clone());
        Ok(stored)
    }

    async fn vote_tally(&self, event_id: i32) -> StoreResult<Vec<TalkVotes>> {
        let talks = self.talks_matching(|t| t.event_id == event_id && t.is_active())?;
        let tables = self.tables()?;
        let mut tally: Vec<TalkVotes> = talks
            .into_iter()
            .map(|talk| {
                let votes = tables.votes.iter().filter(|v| v.talk_id == talk.id).count() as i64;
                TalkVotes { talk, votes }
            })
            .collect();
        tally.sort_by_key(|t| (Reverse(t.votes), t.talk.position));
        Ok(tally)
    }
}

//! Template contexts for every page.
//!
//! Each page is assembled per request from store lookups. Talk cards carry
//! their speaker, so a page that lists talks loads the speakers once and
//! joins them in memory.

use std::collections::HashMap;
use rocket::http::Status;
use serde::Serialize;
use shared::{models::*, paths};
use crate::store::{ContentStore, StoreResult};
use crate::utils::{format_date, format_datetime};

#[derive(Debug, Serialize)]
pub struct SpeakerCard {
    pub id: i32,
    pub name: String,
    pub company: String,
    pub bio: String,
    pub photo_url: Option<String>,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct TalkCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub slides_url: Option<String>,
    pub video_url: Option<String>,
    pub url: String,
    pub vote_url: String,
    pub speaker: Option<SpeakerCard>,
}

#[derive(Debug, Serialize)]
pub struct EventCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub date: Option<String>,
    pub starts_at: Option<String>,
    pub venue: Option<String>,
    pub votable: bool,
    pub url: String,
    pub talks: Vec<TalkCard>,
}

#[derive(Debug, Serialize)]
pub struct TutorialCard {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct VoteRow {
    pub talk: TalkCard,
    pub votes: i64,
}

impl From<Speaker> for SpeakerCard {
    fn from(speaker: Speaker) -> Self {
        let url = speaker.url();
        Self {
            id: speaker.id,
            name: speaker.name,
            company: speaker.company,
            bio: speaker.bio,
            photo_url: speaker.photo_url,
            url,
        }
    }
}

impl From<Tutorial> for TutorialCard {
    fn from(tutorial: Tutorial) -> Self {
        let url = tutorial.url();
        Self {
            id: tutorial.id,
            title: tutorial.title,
            description: tutorial.description,
            content: tutorial.content,
            date: format_date(tutorial.created_at),
            url,
        }
    }
}

/// Speakers keyed by id, loaded once per page.
pub struct Speakers(HashMap<i32, Speaker>);

impl Speakers {
    pub async fn load(store: &dyn ContentStore) -> StoreResult<Self> {
        Ok(Self(store.speakers().await?.into_iter().map(|s| (s.id, s)).collect()))
    }

    pub fn talk_card(&self, talk: Talk) -> TalkCard {
        let url = talk.url();
        TalkCard {
            id: talk.id,
            vote_url: paths::vote_path(talk.id),
            speaker: self.0.get(&talk.speaker_id).cloned().map(SpeakerCard::from),
            name: talk.name,
            description: talk.description,
            slides_url: talk.slides_url,
            video_url: talk.video_url,
            url,
        }
    }

    /// Event card with the event's active talks.
    pub async fn event_with_talks(&self, store: &dyn ContentStore, event: Event) -> StoreResult<EventCard> {
        let talks = store.event_talks(event.id).await?;
        Ok(event_card(event, talks.into_iter().map(|t| self.talk_card(t)).collect()))
    }
}

pub fn event_card(event: Event, talks: Vec<TalkCard>) -> EventCard {
    let url = event.url();
    EventCard {
        id: event.id,
        name: event.name,
        description: event.description,
        date: event.starts_at.map(format_date),
        starts_at: event.starts_at.map(format_datetime),
        venue: event.venue,
        votable: event.votable,
        url,
        talks,
    }
}

#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub title: &'static str,
    pub events: Vec<EventCard>,
    pub main_event: Option<EventCard>,
}

#[derive(Debug, Serialize)]
pub struct EventListPage {
    pub title: &'static str,
    pub events: Vec<EventCard>,
}

#[derive(Debug, Serialize)]
pub struct EventPage {
    pub title: String,
    pub event: EventCard,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Serialize)]
pub struct TalkPage {
    pub title: String,
    pub talk: TalkCard,
    pub event: EventCard,
}

#[derive(Debug, Serialize)]
pub struct SpeakerListPage {
    pub title: &'static str,
    pub speakers: Vec<SpeakerCard>,
}

#[derive(Debug, Serialize)]
pub struct SpeakerPage {
    pub title: String,
    pub speaker: SpeakerCard,
    pub talks: Vec<TalkCard>,
}

#[derive(Debug, Serialize)]
pub struct TutorialListPage {
    pub title: &'static str,
    pub tutorials: Vec<TutorialCard>,
}

#[derive(Debug, Serialize)]
pub struct TutorialPage {
    pub title: String,
    pub tutorial: TutorialCard,
}

#[derive(Debug, Serialize)]
pub struct AboutPage {
    pub title: &'static str,
    pub photos: Vec<Photo>,
}

#[derive(Debug, Serialize)]
pub struct LivePage {
    pub title: &'static str,
    pub event: Option<EventCard>,
}

#[derive(Debug, Serialize)]
pub struct VoteResultsPage {
    pub title: &'static str,
    pub event: Option<EventCard>,
    pub results: Vec<VoteRow>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorPage {
    pub title: String,
    pub status: u16,
    pub message: String,
}

impl ErrorPage {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            title: status.reason_lossy().to_string(),
            status: status.code,
            message: message.into(),
        }
    }
}

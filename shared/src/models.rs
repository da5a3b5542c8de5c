use serde::{Serialize, Deserialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "backend", derive(sqlx::Type))]
#[cfg_attr(feature = "backend", sqlx(type_name = "event_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Planning,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "backend", derive(sqlx::Type))]
#[cfg_attr(feature = "backend", sqlx(type_name = "talk_status", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TalkStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub starts_at: Option<OffsetDateTime>,
    pub venue: Option<String>,
    pub status: EventStatus,
    pub votable: bool,
    pub spotlight: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Talk {
    pub id: i32,
    pub event_id: i32,
    pub speaker_id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub slides_url: Option<String>,
    pub video_url: Option<String>,
    pub status: TalkStatus,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub company: String,
    pub bio: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: i32,
    pub event_id: Option<i32>,
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "backend", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: i64,
    pub talk_id: i32,
    pub event_id: i32,
    pub ip: String,
    pub user_agent: String,
    pub created_at: OffsetDateTime,
}

/// A vote that has passed the policy checks and is ready to be stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVote {
    pub talk_id: i32,
    pub event_id: i32,
    pub ip: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TalkVotes {
    pub talk: Talk,
    pub votes: i64,
}

impl Event {
    pub fn is_visible(&self) -> bool {
        self.status != EventStatus::Draft
    }

    pub fn is_archived(&self) -> bool {
        self.status == EventStatus::Archived
    }
}

impl Talk {
    pub fn is_active(&self) -> bool {
        self.status == TalkStatus::Active
    }
}

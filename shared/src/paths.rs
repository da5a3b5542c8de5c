//! Public URL forms for every page the site serves.
//!
//! Talks have exactly one canonical form, `/meetups/{event}/{slug}/`. Older
//! links (`/meetup/...`, `/talk/{id}/`) are answered with a redirect to it.

use crate::models::{Event, Speaker, Talk, Tutorial};

pub const VOTE_RESULTS: &str = "/vote-results/";

pub fn event_path(event_id: i32) -> String {
    format!("/meetups/{}/", event_id)
}

/// Canonical path of a talk, derived from its event number and slug.
pub fn talk_path(event_id: i32, slug: &str) -> String {
    format!("/meetups/{}/{}/", event_id, slug)
}

pub fn speaker_path(speaker_id: i32) -> String {
    format!("/speakers/{}/", speaker_id)
}

pub fn tutorial_path(tutorial_id: i32) -> String {
    format!("/tutorials/{}/", tutorial_id)
}

pub fn vote_path(talk_id: i32) -> String {
    format!("/vote/{}/", talk_id)
}

impl Event {
    pub fn url(&self) -> String {
        event_path(self.id)
    }
}

impl Talk {
    pub fn url(&self) -> String {
        talk_path(self.event_id, &self.slug)
    }
}

impl Speaker {
    pub fn url(&self) -> String {
        speaker_path(self.id)
    }
}

impl Tutorial {
    pub fn url(&self) -> String {
        tutorial_path(self.id)
    }
}

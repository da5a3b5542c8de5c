use rocket::http::Status;
use tracing::{debug, error, info};
use shared::{models::*, voter::VoterInfo};
use crate::store::{ContentStore, StoreError};

pub const VOTE_COOKIE: &str = "moscowdjango_vote";
pub const VOTE_COOKIE_VALUE: &str = "done";

#[derive(Debug, Clone, thiserror::Error)]
pub enum VoteRejection {
    #[error("Only POST")]
    WrongMethod,
    #[error("Only one vote, man")]
    AlreadyVoted,
    #[error("Talk not found")]
    TalkNotFound,
    #[error("Voting is closed, sorry")]
    VotingClosed,
    #[error("DB error, sorry")]
    Lookup(StoreError),
    #[error("DB error, sorry")]
    Storage(StoreError),
}

impl VoteRejection {
    pub fn status(&self) -> Status {
        match self {
            VoteRejection::WrongMethod => Status::PaymentRequired,
            VoteRejection::AlreadyVoted => Status::Conflict,
            VoteRejection::TalkNotFound => Status::NotFound,
            VoteRejection::VotingClosed => Status::Conflict,
            VoteRejection::Lookup(_) => Status::InternalServerError,
            VoteRejection::Storage(_) => Status::PaymentRequired,
        }
    }
}

pub struct VoteProcessor;

impl VoteProcessor {
    /// Applies the one-vote-per-browser rule and records the vote.
    ///
    /// `already_voted` reflects the tracking cookie on the request. Nothing is
    /// written unless every check passes.
    pub async fn cast(
        store: &dyn ContentStore,
        talk_id: i32,
        already_voted: bool,
        voter: &VoterInfo,
    ) -> Result<Vote, VoteRejection> {
        if already_voted {
            debug!("Vote cookie already present");
            return Err(VoteRejection::AlreadyVoted);
        }

        let talk = store.talk(talk_id).await
            .map_err(VoteRejection::Lookup)?
            .ok_or(VoteRejection::TalkNotFound)?;

        let event = store.event(talk.event_id).await
            .map_err(VoteRejection::Lookup)?
            .ok_or_else(|| VoteRejection::Lookup(StoreError::Database(
                format!("talk {} references missing event {}", talk.id, talk.event_id)
            )))?;

        if !event.votable {
            return Err(VoteRejection::VotingClosed);
        }

        let vote = NewVote {
            talk_id: talk.id,
            event_id: event.id,
            ip: voter.ip.clone(),
            user_agent: voter.user_agent.clone(),
        };

        match store.create_vote(&vote).await {
            Ok(stored) => {
                info!("Recorded vote {} for talk {}", stored.id, talk.id);
                Ok(stored)
            }
            Err(e) => {
                error!("Failed to store vote for talk {}: {}", talk.id, e);
                Err(VoteRejection::Storage(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn voter() -> VoterInfo {
        VoterInfo { ip: "10.1.1.1".into(), user_agent: "tests".into() }
    }

    fn store(votable: bool) -> MemoryStore {
        let store = MemoryStore::new();
        store.add_event(Event {
            id: 1,
            name: "Meetup".into(),
            description: String::new(),
            starts_at: None,
            venue: None,
            status: EventStatus::Published,
            votable,
            spotlight: true,
        }).unwrap();
        store.add_talk(Talk {
            id: 5,
            event_id: 1,
            speaker_id: 1,
            name: "Talk".into(),
            slug: "talk".into(),
            description: String::new(),
            slides_url: None,
            video_url: None,
            status: TalkStatus::Active,
            position: 0,
        }).unwrap();
        store
    }

    #[rocket::async_test]
    async fn test_records_vote() {
        let store = store(true);
        let vote = VoteProcessor::cast(&store, 5, false, &voter()).await.unwrap();
        assert_eq!((vote.talk_id, vote.event_id), (5, 1));
        assert_eq!(vote.ip, "10.1.1.1");
        assert_eq!(vote.user_agent, "tests");
        assert_eq!(store.votes().unwrap().len(), 1);
    }

    #[rocket::async_test]
    async fn test_rejections_write_nothing() {
        let store = store(false);
        let closed = VoteProcessor::cast(&store, 5, false, &voter()).await.unwrap_err();
        assert!(matches!(closed, VoteRejection::VotingClosed));
        assert_eq!(closed.status(), Status::Conflict);

        let repeat = VoteProcessor::cast(&store, 5, true, &voter()).await.unwrap_err();
        assert!(matches!(repeat, VoteRejection::AlreadyVoted));

        let missing = VoteProcessor::cast(&store, 99, false, &voter()).await.unwrap_err();
        assert_eq!(missing.status(), Status::NotFound);

        assert!(store.votes().unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn test_cookie_checked_before_lookup() {
        let store = MemoryStore::new();
        let err = VoteProcessor::cast(&store, 99, true, &voter()).await.unwrap_err();
        assert!(matches!(err, VoteRejection::AlreadyVoted));
    }

    #[rocket::async_test]
    async fn test_storage_failure() {
        let store = store(true);
        store.fail_writes(true);
        let err = VoteProcessor::cast(&store, 5, false, &voter()).await.unwrap_err();
        assert!(matches!(err, VoteRejection::Storage(_)));
        assert_eq!(err.status(), Status::PaymentRequired);
        assert_eq!(err.to_string(), "DB error, sorry");
    }
}

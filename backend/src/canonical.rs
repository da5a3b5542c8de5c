use shared::models::Talk;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TalkLocation {
    /// The request already used the canonical path; render the page.
    Canonical,
    /// The talk lives elsewhere; redirect there.
    Moved(String),
}

/// Compares the requested path with the talk's canonical one.
pub fn resolve_talk_location(talk: &Talk, requested_path: &str) -> TalkLocation {
    let canonical = talk.url();
    if canonical == requested_path {
        TalkLocation::Canonical
    } else {
        TalkLocation::Moved(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TalkStatus;

    fn talk() -> Talk {
        Talk {
            id: 3,
            event_id: 7,
            speaker_id: 1,
            name: "Channels".into(),
            slug: "channels".into(),
            description: String::new(),
            slides_url: None,
            video_url: None,
            status: TalkStatus::Active,
            position: 1,
        }
    }

    #[test]
    fn test_canonical_path_renders() {
        assert_eq!(resolve_talk_location(&talk(), "/meetups/7/channels/"), TalkLocation::Canonical);
    }

    #[test]
    fn test_other_forms_redirect() {
        let moved = TalkLocation::Moved("/meetups/7/channels/".into());
        assert_eq!(resolve_talk_location(&talk(), "/talk/3/"), moved);
        assert_eq!(resolve_talk_location(&talk(), "/meetup/7/channels/"), moved);
        assert_eq!(resolve_talk_location(&talk(), "/meetups/007/channels/"), moved);
    }
}

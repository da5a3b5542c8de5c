#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use time::OffsetDateTime;
    use crate::models::{Event, EventStatus, Talk, TalkStatus};
    use crate::paths::{talk_path, event_path, vote_path};
    use crate::validation::{is_valid_email, is_valid_slug, validate_email, ValidationError};
    use crate::voter::{resolve_client_ip, UNKNOWN_IP};

    fn event(status: EventStatus) -> Event {
        Event {
            id: 12,
            name: "Moscow Django #12".into(),
            description: String::new(),
            starts_at: Some(OffsetDateTime::UNIX_EPOCH),
            venue: None,
            status,
            votable: false,
            spotlight: false,
        }
    }

    fn talk(slug: &str) -> Talk {
        Talk {
            id: 5,
            event_id: 12,
            speaker_id: 1,
            name: "Async views".into(),
            slug: slug.into(),
            description: String::new(),
            slides_url: None,
            video_url: None,
            status: TalkStatus::Active,
            position: 0,
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(talk_path(12, "async-views"), "/meetups/12/async-views/");
        assert_eq!(talk("async-views").url(), "/meetups/12/async-views/");
        assert_eq!(event_path(3), "/meetups/3/");
        assert_eq!(vote_path(5), "/vote/5/");
    }

    #[test]
    fn test_event_visibility() {
        assert!(!event(EventStatus::Draft).is_visible());
        assert!(event(EventStatus::Planning).is_visible());
        assert!(event(EventStatus::Archived).is_visible());
        assert!(event(EventStatus::Archived).is_archived());
        assert!(!event(EventStatus::Published).is_archived());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@example.co.uk"));

        assert_eq!(validate_email(""), Err(ValidationError::EmptyEmail));
        assert_eq!(validate_email("nobody.example.com"), Err(ValidationError::MissingAt));
        assert_eq!(validate_email("a@localhost"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@@b.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a b@c.com"), Err(ValidationError::InvalidEmail));

        let long = format!("{}@example.com", "a".repeat(300));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_slugs() {
        assert!(is_valid_slug("async-views"));
        assert!(is_valid_slug("talk_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug("with space"));
    }

    #[test]
    fn test_client_ip_resolution() {
        let peer = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));

        assert_eq!(resolve_client_ip(Some("1.2.3.4"), Some("5.6.7.8"), peer), "1.2.3.4");
        assert_eq!(resolve_client_ip(None, Some("5.6.7.8, 10.0.0.1"), peer), "5.6.7.8");
        assert_eq!(resolve_client_ip(Some(" "), None, peer), "10.0.0.7");
        assert_eq!(resolve_client_ip(None, None, None), UNKNOWN_IP);
    }
}

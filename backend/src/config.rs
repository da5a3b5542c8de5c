use shared::paths;

pub const RECENT_PHOTOS: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct MailchimpSettings {
    pub api_key: String,
    pub list_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Returned as the body of a successful vote.
    pub results_path: String,
    /// How many photos the about page shows.
    pub recent_photos: i64,
    pub mailchimp: Option<MailchimpSettings>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            results_path: paths::VOTE_RESULTS.to_string(),
            recent_photos: RECENT_PHOTOS,
            mailchimp: None,
        }
    }
}

impl SiteConfig {
    /// Builds the config from a secret lookup such as shuttle's `SecretStore::get`.
    pub fn from_secrets(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        let mailchimp = match (non_empty("MAILCHIMP_API_KEY"), non_empty("MAILCHIMP_LIST_ID")) {
            (Some(api_key), Some(list_id)) => Some(MailchimpSettings { api_key, list_id }),
            _ => None,
        };

        let recent_photos = non_empty("RECENT_PHOTOS")
            .and_then(|value| value.trim().parse().ok())
            .filter(|count: &i64| *count > 0)
            .unwrap_or(RECENT_PHOTOS);

        Self {
            recent_photos,
            mailchimp,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_secrets() {
        assert_eq!(SiteConfig::from_secrets(lookup(&[])), SiteConfig::default());
    }

    #[test]
    fn test_mailchimp_needs_both_keys() {
        let partial = SiteConfig::from_secrets(lookup(&[("MAILCHIMP_API_KEY", "abc-us6")]));
        assert_eq!(partial.mailchimp, None);

        let full = SiteConfig::from_secrets(lookup(&[
            ("MAILCHIMP_API_KEY", "abc-us6"),
            ("MAILCHIMP_LIST_ID", "list"),
            ("RECENT_PHOTOS", "4"),
        ]));
        assert_eq!(full.mailchimp, Some(MailchimpSettings {
            api_key: "abc-us6".into(),
            list_id: "list".into(),
        }));
        assert_eq!(full.recent_photos, 4);
    }

    #[test]
    fn test_bad_photo_count_falls_back() {
        let config = SiteConfig::from_secrets(lookup(&[("RECENT_PHOTOS", "-3")]));
        assert_eq!(config.recent_photos, RECENT_PHOTOS);
    }
}

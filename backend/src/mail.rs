use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, warn};

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum MailError {
    #[error("Address is already subscribed")]
    Duplicate,
    #[error("Mail list rejected the address: {0}")]
    Rejected(String),
    #[error("Mail list unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid mail list configuration: {0}")]
    Config(String),
}

/// Outbound list that collects subscriber addresses.
#[rocket::async_trait]
pub trait MailCollector: Send + Sync {
    async fn submit(&self, email: &str) -> Result<(), MailError>;
}

/// Keeps subscribers in the site's own database.
pub struct PgMailCollector {
    pool: PgPool,
}

impl PgMailCollector {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[rocket::async_trait]
impl MailCollector for PgMailCollector {
    async fn submit(&self, email: &str) -> Result<(), MailError> {
        sqlx::query("INSERT INTO subscribers (email) VALUES (lower($1))")
            .bind(email)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| match e.as_database_error() {
                Some(db) if db.is_unique_violation() => MailError::Duplicate,
                _ => MailError::Unavailable(e.to_string()),
            })
    }
}

#[derive(Deserialize)]
struct MailchimpProblem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

pub const MAILCHIMP_TIMEOUT: Duration = Duration::from_secs(10);

/// Adds subscribers to a Mailchimp audience with double opt-in.
pub struct MailchimpCollector {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

/// Mailchimp keys end with the datacenter they live in, e.g. `…-us6`.
pub fn mailchimp_datacenter(api_key: &str) -> Result<&str, MailError> {
    match api_key.rsplit_once('-') {
        Some((key, dc)) if !key.is_empty() && !dc.is_empty() && dc.chars().all(|c| c.is_ascii_alphanumeric()) => Ok(dc),
        _ => Err(MailError::Config("API key has no datacenter suffix".into())),
    }
}

impl MailchimpCollector {
    pub fn new(api_key: impl Into<String>, list_id: &str) -> Result<Self, MailError> {
        let api_key = api_key.into();
        if list_id.trim().is_empty() {
            return Err(MailError::Config("empty list id".into()));
        }
        let endpoint = format!(
            "https://{}.api.mailchimp.com/3.0/lists/{}/members",
            mailchimp_datacenter(&api_key)?,
            list_id.trim()
        );

        let client = reqwest::Client::builder()
            .timeout(MAILCHIMP_TIMEOUT)
            .build()
            .map_err(|e| MailError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[rocket::async_trait]
impl MailCollector for MailchimpCollector {
    async fn submit(&self, email: &str) -> Result<(), MailError> {
        let response = self.client
            .post(&self.endpoint)
            .basic_auth("meetup", Some(&self.api_key))
            .json(&json!({ "email_address": email, "status": "pending" }))
            .send()
            .await
            .map_err(|e| MailError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!("Mailchimp accepted subscriber");
            return Ok(());
        }

        let problem = response.json::<MailchimpProblem>().await.ok();
        match problem {
            Some(p) if p.title == "Member Exists" => Err(MailError::Duplicate),
            Some(p) => {
                warn!("Mailchimp rejected subscriber: {} {}", status, p.detail);
                Err(MailError::Rejected(p.title))
            }
            None => Err(MailError::Unavailable(status.to_string())),
        }
    }
}

/// Collector that keeps addresses in memory, deduplicating case-insensitively.
#[derive(Debug, Default)]
pub struct MemoryMailCollector {
    subscribers: Mutex<BTreeSet<String>>,
}

impl MemoryMailCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribers(&self) -> Vec<String> {
        self.subscribers
            .lock()
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[rocket::async_trait]
impl MailCollector for MemoryMailCollector {
    async fn submit(&self, email: &str) -> Result<(), MailError> {
        let mut subscribers = self.subscribers
            .lock()
            .map_err(|e| MailError::Unavailable(e.to_string()))?;

        if subscribers.insert(email.to_lowercase()) {
            Ok(())
        } else {
            Err(MailError::Duplicate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailchimp_datacenter() {
        assert_eq!(mailchimp_datacenter("0123abcd-us6"), Ok("us6"));
        assert!(mailchimp_datacenter("0123abcd").is_err());
        assert!(mailchimp_datacenter("0123abcd-").is_err());
        assert!(mailchimp_datacenter("-us6").is_err());
    }

    #[test]
    fn test_mailchimp_endpoint() {
        let collector = MailchimpCollector::new("0123abcd-us6", "list42").unwrap();
        assert_eq!(collector.endpoint(), "https://us6.api.mailchimp.com/3.0/lists/list42/members");
        assert!(MailchimpCollector::new("0123abcd-us6", " ").is_err());
    }

    #[rocket::async_test]
    async fn test_memory_collector_deduplicates() {
        let collector = MemoryMailCollector::new();
        assert_eq!(collector.submit("a@b.com").await, Ok(()));
        assert_eq!(collector.submit("A@B.com").await, Err(MailError::Duplicate));
        assert_eq!(collector.subscribers(), vec!["a@b.com".to_string()]);
    }
}

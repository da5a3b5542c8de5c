use rocket::FromForm;
use tracing::{debug, warn};
use shared::validation::validate_email;
use crate::mail::MailCollector;

#[derive(Debug, FromForm)]
pub struct SubscribeForm {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    Failed,
}

impl SubscribeOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscribeOutcome::Subscribed => "OK",
            SubscribeOutcome::Failed => "Failed",
        }
    }
}

/// Validates the submitted address and hands it to the collector once.
pub async fn subscribe_mail(collector: &dyn MailCollector, email: Option<&str>) -> SubscribeOutcome {
    let Some(email) = email.map(str::trim) else {
        debug!("Subscription without an email field");
        return SubscribeOutcome::Failed;
    };

    if let Err(e) = validate_email(email) {
        debug!("Rejected subscription address: {}", e);
        return SubscribeOutcome::Failed;
    }

    match collector.submit(email).await {
        Ok(()) => SubscribeOutcome::Subscribed,
        Err(e) => {
            warn!("Mail collector refused subscription: {}", e);
            SubscribeOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use super::*;
    use crate::mail::{MailError, MemoryMailCollector};

    #[derive(Default)]
    struct CountingCollector {
        calls: AtomicUsize,
    }

    #[rocket::async_trait]
    impl MailCollector for CountingCollector {
        async fn submit(&self, _email: &str) -> Result<(), MailError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MailError::Unavailable("offline".into()))
        }
    }

    #[rocket::async_test]
    async fn test_invalid_input_never_reaches_collector() {
        let collector = CountingCollector::default();
        assert_eq!(subscribe_mail(&collector, None).await, SubscribeOutcome::Failed);
        assert_eq!(subscribe_mail(&collector, Some("")).await, SubscribeOutcome::Failed);
        assert_eq!(subscribe_mail(&collector, Some("not-an-email")).await, SubscribeOutcome::Failed);
        assert_eq!(collector.calls.load(Ordering::SeqCst), 0);

        assert_eq!(subscribe_mail(&collector, Some("a@b.com")).await, SubscribeOutcome::Failed);
        assert_eq!(collector.calls.load(Ordering::SeqCst), 1);
    }

    #[rocket::async_test]
    async fn test_duplicates_follow_collector() {
        let collector = MemoryMailCollector::new();
        assert_eq!(subscribe_mail(&collector, Some(" a@b.com ")).await, SubscribeOutcome::Subscribed);
        assert_eq!(subscribe_mail(&collector, Some("a@b.com")).await, SubscribeOutcome::Failed);
        assert_eq!(collector.subscribers(), vec!["a@b.com".to_string()]);
    }
}

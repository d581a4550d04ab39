//! Read-only pull of a book's reviews from the review ledger, used by the
//! registry's HTML detail page. Reads are never gated; a failure here only
//! degrades the page.

use std::time::Duration;

use async_trait::async_trait;
use configs::RemoteServiceConfig;
use models::review;
use reqwest::Url;
use tracing::warn;

use crate::errors::ServiceError;

#[async_trait]
pub trait ReviewFeed: Send + Sync {
    async fn reviews_for(&self, book_id: i32) -> Result<Vec<review::Model>, ServiceError>;
}

#[derive(Clone, Debug)]
pub struct HttpReviewFeed {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpReviewFeed {
    pub fn new(base_url: &str, request_timeout: Duration, connect_timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::Remote(format!("invalid review ledger url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Remote(format!("review ledger url {base_url} cannot carry a path")));
        }
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ServiceError::Remote(format!("http client build failed: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(cfg: &RemoteServiceConfig) -> Result<Self, ServiceError> {
        Self::new(
            &cfg.base_url,
            Duration::from_millis(cfg.request_timeout_ms),
            Duration::from_millis(cfg.connect_timeout_ms),
        )
    }

    fn reviews_url(&self, book_id: i32) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "reviews", &book_id.to_string()]);
        }
        url
    }
}

#[async_trait]
impl ReviewFeed for HttpReviewFeed {
    async fn reviews_for(&self, book_id: i32) -> Result<Vec<review::Model>, ServiceError> {
        let url = self.reviews_url(book_id);
        let resp = self.client.get(url).send().await.map_err(|e| {
            warn!(book_id, error = %e, "review ledger unreachable");
            ServiceError::Remote(e.to_string())
        })?;
        if !resp.status().is_success() {
            warn!(book_id, status = %resp.status(), "review ledger refused review listing");
            return Err(ServiceError::Remote(format!("review ledger answered {}", resp.status())));
        }
        resp.json::<Vec<review::Model>>().await.map_err(|e| ServiceError::Remote(e.to_string()))
    }
}

/// Fixed review lists for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use super::*;

    /// `None` simulates a ledger that cannot be reached.
    #[derive(Default)]
    pub struct StaticReviewFeed {
        reviews: Option<Vec<review::Model>>,
    }

    impl StaticReviewFeed {
        pub fn with_reviews(reviews: Vec<review::Model>) -> Self {
            Self { reviews: Some(reviews) }
        }

        pub fn unavailable() -> Self {
            Self { reviews: None }
        }
    }

    #[async_trait]
    impl ReviewFeed for StaticReviewFeed {
        async fn reviews_for(&self, book_id: i32) -> Result<Vec<review::Model>, ServiceError> {
            match &self.reviews {
                Some(all) => Ok(all.iter().filter(|r| r.book_id == book_id).cloned().collect()),
                None => Err(ServiceError::Remote("review ledger unavailable".into())),
            }
        }
    }
}

//! Cross-service book existence check.
//!
//! A service that stores book references (the review ledger, and the book
//! registry itself on its update/delete paths) never trusts a reference it
//! cannot confirm. Before such a mutation it asks the registry's
//! `GET /api/books/{id}` endpoint and classifies the answer into an
//! [`ExistenceCheck`]. Only [`ExistenceCheck::Exists`] lets the mutation
//! proceed: a registry that cannot be reached blocks writes exactly like a
//! book that is known to be absent.
//!
//! The check is a point-in-time answer. Nothing stops the book from being
//! deleted between a positive check and the dependent write, so a review can
//! still end up orphaned; that window is accepted.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use configs::RemoteServiceConfig;
use models::submission::parse_integer;
use reqwest::{StatusCode, Url};
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::observability;

/// Outcome of one existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceCheck {
    /// The registry answered 2xx.
    Exists,
    /// The registry answered 4xx, including a reference it could not parse.
    NotFound,
    /// Transport failure, timeout, or a status that is neither 2xx nor 4xx.
    DependencyUnavailable,
}

impl ExistenceCheck {
    /// Fail-closed gate: anything short of a confirmed book blocks the write.
    pub fn permits_mutation(self) -> bool {
        matches!(self, ExistenceCheck::Exists)
    }

    pub fn as_label(self) -> &'static str {
        match self {
            ExistenceCheck::Exists => "exists",
            ExistenceCheck::NotFound => "not_found",
            ExistenceCheck::DependencyUnavailable => "dependency_unavailable",
        }
    }
}

impl fmt::Display for ExistenceCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Map a registry response status onto a check outcome.
pub fn classify_status(status: StatusCode) -> ExistenceCheck {
    if status.is_success() {
        ExistenceCheck::Exists
    } else if status.is_client_error() {
        ExistenceCheck::NotFound
    } else {
        ExistenceCheck::DependencyUnavailable
    }
}

/// Answers "does book X exist right now" on behalf of a caller that does not
/// own books.
#[async_trait]
pub trait BookExistence: Send + Sync {
    /// `book_ref` is passed through as submitted; integer coercion is the
    /// registry's job. Never errors: every failure is folded into the outcome.
    async fn check(&self, book_ref: &str) -> ExistenceCheck;
}

/// Existence check over HTTP against a book registry.
#[derive(Clone, Debug)]
pub struct HttpBookRegistry {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBookRegistry {
    pub fn new(base_url: &str, request_timeout: Duration, connect_timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::Remote(format!("invalid book registry url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::Remote(format!("book registry url {base_url} cannot carry a path")));
        }
        // Redirects are not followed: a 3xx is not a confirmation.
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .redirect(reqwest::redirect::Policy::none())
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

    /// `{base}/api/books/{book_ref}` with `book_ref` encoded as one segment.
    pub fn book_url(&self, book_ref: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "books", book_ref]);
        }
        url
    }
}

#[async_trait]
impl BookExistence for HttpBookRegistry {
    async fn check(&self, book_ref: &str) -> ExistenceCheck {
        let url = self.book_url(book_ref);
        let started = Instant::now();
        let outcome = match self.client.get(url.clone()).send().await {
            Ok(resp) => {
                let outcome = classify_status(resp.status());
                if outcome == ExistenceCheck::DependencyUnavailable {
                    warn!(book_ref, status = %resp.status(), "book registry answered with an unusable status");
                }
                outcome
            }
            Err(e) => {
                warn!(
                    book_ref,
                    %url,
                    timeout = e.is_timeout(),
                    connect = e.is_connect(),
                    error = %e,
                    "book registry unreachable"
                );
                ExistenceCheck::DependencyUnavailable
            }
        };
        let elapsed = started.elapsed();
        observability::record_existence_check(outcome, elapsed);
        debug!(book_ref, %outcome, elapsed_ms = elapsed.as_millis() as u64, "existence check finished");
        outcome
    }
}

/// Gate a mutation on `book_ref`: returns the book id when the registry
/// confirms it, `UnverifiedBook` otherwise.
pub async fn require_book(registry: &dyn BookExistence, book_ref: &str) -> Result<i32, ServiceError> {
    let outcome = registry.check(book_ref).await;
    if !outcome.permits_mutation() {
        return Err(ServiceError::UnverifiedBook { book_ref: book_ref.to_string(), outcome });
    }
    // The registry coerced it already; a reference we cannot store as an id
    // is treated as not found rather than trusted.
    parse_integer(book_ref).ok_or_else(|| ServiceError::UnverifiedBook {
        book_ref: book_ref.to_string(),
        outcome: ExistenceCheck::NotFound,
    })
}

/// Fixed-answer checkers for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Knows a fixed set of book ids; `unavailable` simulates a dead registry.
    #[derive(Default)]
    pub struct StaticBookExistence {
        known: Mutex<HashSet<i32>>,
        unavailable: bool,
        calls: Mutex<Vec<String>>,
    }

    impl StaticBookExistence {
        pub fn with_books<I: IntoIterator<Item = i32>>(ids: I) -> Self {
            Self { known: Mutex::new(ids.into_iter().collect()), ..Self::default() }
        }

        pub fn unavailable() -> Self {
            Self { unavailable: true, ..Self::default() }
        }

        pub fn forget(&self, id: i32) {
            locked(&self.known).remove(&id);
        }

        /// References checked so far, in order.
        pub fn calls(&self) -> Vec<String> {
            locked(&self.calls).clone()
        }
    }

    #[async_trait]
    impl BookExistence for StaticBookExistence {
        async fn check(&self, book_ref: &str) -> ExistenceCheck {
            locked(&self.calls).push(book_ref.to_string());
            if self.unavailable {
                return ExistenceCheck::DependencyUnavailable;
            }
            match parse_integer(book_ref) {
                Some(id) if locked(&self.known).contains(&id) => ExistenceCheck::Exists,
                _ => ExistenceCheck::NotFound,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::StaticBookExistence;
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Router};
    use tokio::net::TcpListener;

    /// Registry stand-in: `/api/books/{id}` answers by id.
    async fn stub_registry() -> String {
        async fn book(Path(id): Path<String>) -> (AxumStatus, String) {
            match id.as_str() {
                "1" => (AxumStatus::OK, r#"{"id":1}"#.into()),
                "500" => (AxumStatus::INTERNAL_SERVER_ERROR, String::new()),
                "503" => (AxumStatus::SERVICE_UNAVAILABLE, String::new()),
                "302" => (AxumStatus::FOUND, String::new()),
                "slow" => {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    (AxumStatus::OK, String::new())
                }
                "a/b" => (AxumStatus::OK, "decoded".into()),
                "abc" => (AxumStatus::BAD_REQUEST, String::new()),
                _ => (AxumStatus::NOT_FOUND, r#"{"error":"Book not found"}"#.into()),
            }
        }
        let app = Router::new().route("/api/books/:id", get(book));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    fn registry(base: &str) -> HttpBookRegistry {
        HttpBookRegistry::new(base, Duration::from_millis(300), Duration::from_millis(300)).unwrap()
    }

    #[test]
    fn only_exists_permits_mutation() {
        assert!(ExistenceCheck::Exists.permits_mutation());
        assert!(!ExistenceCheck::NotFound.permits_mutation());
        assert!(!ExistenceCheck::DependencyUnavailable.permits_mutation());
    }

    #[test]
    fn status_classification() {
        assert_eq!(classify_status(StatusCode::OK), ExistenceCheck::Exists);
        assert_eq!(classify_status(StatusCode::NO_CONTENT), ExistenceCheck::Exists);
        assert_eq!(classify_status(StatusCode::NOT_FOUND), ExistenceCheck::NotFound);
        assert_eq!(classify_status(StatusCode::BAD_REQUEST), ExistenceCheck::NotFound);
        assert_eq!(classify_status(StatusCode::BAD_GATEWAY), ExistenceCheck::DependencyUnavailable);
        assert_eq!(classify_status(StatusCode::MOVED_PERMANENTLY), ExistenceCheck::DependencyUnavailable);
    }

    #[test]
    fn book_url_encodes_reference_as_one_segment() {
        let r = registry("http://registry.local:5001");
        assert_eq!(r.book_url("42").as_str(), "http://registry.local:5001/api/books/42");
        assert_eq!(r.book_url("a/b").as_str(), "http://registry.local:5001/api/books/a%2Fb");
        let prefixed = registry("http://registry.local/catalog/");
        assert_eq!(prefixed.book_url("7").as_str(), "http://registry.local/catalog/api/books/7");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpBookRegistry::new("not a url", Duration::from_secs(1), Duration::from_secs(1)).is_err());
        assert!(HttpBookRegistry::new("mailto:books@example.com", Duration::from_secs(1), Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn live_registry_outcomes() {
        let base = stub_registry().await;
        let r = registry(&base);
        assert_eq!(r.check("1").await, ExistenceCheck::Exists);
        assert_eq!(r.check("999999").await, ExistenceCheck::NotFound);
        assert_eq!(r.check("abc").await, ExistenceCheck::NotFound);
        assert_eq!(r.check("500").await, ExistenceCheck::DependencyUnavailable);
        assert_eq!(r.check("503").await, ExistenceCheck::DependencyUnavailable);
        assert_eq!(r.check("302").await, ExistenceCheck::DependencyUnavailable);
        assert_eq!(r.check("a/b").await, ExistenceCheck::Exists);
    }

    #[tokio::test]
    async fn timeout_is_unavailable() {
        let base = stub_registry().await;
        let r = registry(&base);
        let started = Instant::now();
        assert_eq!(r.check("slow").await, ExistenceCheck::DependencyUnavailable);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let r = registry(&format!("http://{addr}"));
        assert_eq!(r.check("1").await, ExistenceCheck::DependencyUnavailable);
    }

    #[tokio::test]
    async fn require_book_fails_closed() {
        let down = StaticBookExistence::unavailable();
        match require_book(&down, "5").await {
            Err(ServiceError::UnverifiedBook { outcome, .. }) => {
                assert_eq!(outcome, ExistenceCheck::DependencyUnavailable)
            }
            other => panic!("unexpected {other:?}"),
        }

        let known = StaticBookExistence::with_books([5]);
        assert_eq!(require_book(&known, "5").await.unwrap(), 5);
        assert_eq!(require_book(&known, " 5 ").await.unwrap(), 5);
        assert!(require_book(&known, "6").await.is_err());
        assert_eq!(known.calls(), vec!["5", " 5 ", "6"]);
    }

    /// A registry that says yes to a reference we cannot store still blocks.
    #[tokio::test]
    async fn unparseable_confirmed_reference_is_not_found() {
        struct YesMan;
        #[async_trait]
        impl BookExistence for YesMan {
            async fn check(&self, _: &str) -> ExistenceCheck { ExistenceCheck::Exists }
        }
        match require_book(&YesMan, "five").await {
            Err(ServiceError::UnverifiedBook { outcome, .. }) => assert_eq!(outcome, ExistenceCheck::NotFound),
            other => panic!("unexpected {other:?}"),
        }
    }
}

//! Request body extractor for the mutating endpoints.
//!
//! HTML forms post `application/x-www-form-urlencoded`; API clients may post
//! a JSON object instead. Both end up as the same [`Submission`].

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{Form, Json};
use models::Submission;
use serde_json::{Map, Value};

use crate::errors::JsonApiError;

#[derive(Debug, Clone)]
pub struct SubmittedFields(pub Submission);

#[async_trait]
impl<S> FromRequest<S> for SubmittedFields
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
            .unwrap_or(false);
        let submission = if is_json {
            let Json(object) = Json::<Map<String, Value>>::from_request(req, state).await.map_err(rejected)?;
            from_json_object(object)
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await.map_err(rejected)?;
            pairs.into_iter().collect()
        };
        Ok(SubmittedFields(submission))
    }
}

fn rejected<R: IntoResponse + ToString>(rejection: R) -> JsonApiError {
    let message = rejection.to_string();
    let status = rejection.into_response().status();
    JsonApiError::new(status, message)
}

/// `null` counts as absent; other non-string values keep their JSON text.
fn from_json_object(object: Map<String, Value>) -> Submission {
    let mut submission = Submission::new();
    for (name, value) in object {
        match value {
            Value::Null => {}
            Value::String(s) => submission.insert(name, s),
            other => submission.insert(name, other.to_string()),
        }
    }
    submission
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Submission, JsonApiError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        SubmittedFields::from_request(req, &()).await.map(|SubmittedFields(s)| s)
    }

    #[tokio::test]
    async fn form_fields_are_decoded() {
        let s = extract(Some("application/x-www-form-urlencoded"), "title=Dune&author=Frank+Herbert&year=1965")
            .await
            .unwrap();
        assert_eq!(s.get("author"), Some("Frank Herbert"));
        assert_eq!(s.get("year"), Some("1965"));
        assert!(extract(Some("application/x-www-form-urlencoded"), "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_scalars_become_strings_and_null_is_absent() {
        let s = extract(
            Some("application/json; charset=utf-8"),
            r#"{"book_id": 5, "rating": "4", "draft": true, "comment": null}"#,
        )
        .await
        .unwrap();
        assert_eq!(s.get("book_id"), Some("5"));
        assert_eq!(s.get("rating"), Some("4"));
        assert_eq!(s.get("draft"), Some("true"));
        assert_eq!(s.get("comment"), None);
    }

    #[tokio::test]
    async fn json_must_be_an_object() {
        let err = extract(Some("application/json"), "[1,2]").await.unwrap_err();
        assert!(err.status.is_client_error());
        assert!(extract(Some("application/json"), "{oops").await.unwrap_err().status.is_client_error());
        assert!(extract(Some("application/json"), "{}").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_content_type_is_rejected() {
        let err = extract(Some("text/plain"), "title=Dune").await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}

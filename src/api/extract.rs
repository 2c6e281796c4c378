//! Request Extractors
//!
//! Wrappers around the framework extractors so that malformed input surfaces
//! through the same failure taxonomy and envelope as everything else, plus
//! the JSON-or-multipart payload used by the post routes.

use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::service::UploadedImage;
use crate::utils::error::AppError;

/// JSON extractor whose rejection is an envelope-shaped validation failure
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(AppJson(value))
    }
}

/// Path extractor whose rejection is an envelope-shaped validation failure
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(AppPath(value))
    }
}

/// Body of the post create/update routes
///
/// Image-bearing requests arrive as multipart form data (text fields `title`
/// and `content`, files under the `images` field); everything else is plain
/// JSON. Admission of the parsed files (count, mime, size) belongs to the
/// upload relay, not to parsing.
#[derive(Debug, Default)]
pub struct PostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub images: Vec<UploadedImage>,
}

#[derive(Debug, Deserialize)]
struct PostBody {
    title: Option<String>,
    content: Option<String>,
}

impl<S> FromRequest<S> for PostPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let AppJson(body) = AppJson::<PostBody>::from_request(req, state).await?;
            return Ok(Self {
                title: body.title,
                content: body.content,
                images: Vec::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        let mut payload = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))?
        {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("title") => {
                    payload.title = Some(read_text(field).await?);
                }
                Some("content") => {
                    payload.content = Some(read_text(field).await?);
                }
                Some("images") => {
                    let file_name = field.file_name().unwrap_or("image").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Malformed multipart body: {}", e))
                    })?;
                    payload.images.push(UploadedImage {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
                // Unknown fields are ignored, matching the permissive parser
                // the frontend was built against.
                _ => {}
            }
        }

        Ok(payload)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    #[tokio::test]
    async fn test_post_payload_from_json() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/posts")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"Hi","content":"Body"}"#))
            .unwrap();

        let payload = PostPayload::from_request(request, &()).await.unwrap();
        assert_eq!(payload.title.as_deref(), Some("Hi"));
        assert_eq!(payload.content.as_deref(), Some("Body"));
        assert!(payload.images.is_empty());
    }

    #[tokio::test]
    async fn test_post_payload_from_json_partial() {
        let request = HttpRequest::builder()
            .method("PUT")
            .uri("/api/posts/1")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"content":"new"}"#))
            .unwrap();

        let payload = PostPayload::from_request(request, &()).await.unwrap();
        assert!(payload.title.is_none());
        assert_eq!(payload.content.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_post_payload_rejects_malformed_json() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/posts")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let result = PostPayload::from_request(request, &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_post_payload_from_multipart() {
        let boundary = "test-boundary";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"title\"\r\n\r\n\
             Hi\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"content\"\r\n\r\n\
             Body\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"images\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             PNGDATA\r\n\
             --{b}--\r\n",
            b = boundary
        );

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/posts")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let payload = PostPayload::from_request(request, &()).await.unwrap();
        assert_eq!(payload.title.as_deref(), Some("Hi"));
        assert_eq!(payload.content.as_deref(), Some("Body"));
        assert_eq!(payload.images.len(), 1);
        assert_eq!(payload.images[0].file_name, "a.png");
        assert_eq!(payload.images[0].content_type, "image/png");
        assert_eq!(payload.images[0].bytes.as_ref(), b"PNGDATA");
    }
}

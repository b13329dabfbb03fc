//! HTTP handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use bytes::Bytes;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::AppState;
use super::error::ServerError;
use crate::convert::convert_with;
use crate::utils::{attachment_disposition, output_filename};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Media type registered for XSPF
pub const XSPF_CONTENT_TYPE: &str = "application/xspf+xml";

/// Form fields accepted for the upload
const UPLOAD_FIELDS: [&str; 2] = ["jspfFile", "jspf"];

/// Upload page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Liveness check
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Convert an uploaded JSPF file and return the XSPF document as a download
pub async fn convert_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Response, ServerError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, state.max_upload_bytes))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        if !UPLOAD_FIELDS.contains(&field_name.as_str()) {
            return Err(ServerError::BadRequest(format!("Unknown field: {}", field_name)));
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, state.max_upload_bytes))?;

        if upload.is_none() && !data.is_empty() {
            upload = Some((file_name, data));
        }
    }

    let (file_name, data) = upload
        .ok_or_else(|| ServerError::BadRequest("No file uploaded".to_string()))?;
    debug!(file_name = %file_name, size_bytes = data.len(), "Received playlist upload");

    let options = state.options;
    let output = tokio::task::spawn_blocking(move || convert_with(&data, &options))
        .await
        .map_err(|e| ServerError::Internal(format!("Conversion task failed: {}", e)))??;

    let download_name = output_filename(&file_name);
    let disposition = HeaderValue::from_str(&attachment_disposition(&download_name))
        .map_err(|e| ServerError::Internal(format!("Invalid download name: {}", e)))?;

    info!(file_name = %download_name, size_bytes = output.len(), "Converted playlist");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XSPF_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output,
    )
        .into_response())
}

fn multipart_error(err: MultipartError, limit: usize) -> ServerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge { limit }
    } else {
        ServerError::BadRequest(format!("Failed to read upload: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{ConvertOptions, MissingLocationPolicy};
    use crate::server::router;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "playlist-converter-test-boundary";

    fn app() -> Router {
        app_with(AppState {
            options: ConvertOptions::default(),
            max_upload_bytes: 1024 * 1024,
        })
    }

    fn app_with(state: AppState) -> Router {
        router(Arc::new(state))
    }

    fn upload_request(field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/json\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        multipart_request(body)
    }

    fn multipart_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/convert")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, headers, body)
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, _, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_serves_upload_form() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        let (status, _, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("id=\"jspfFile\""));
        assert!(html.contains("/convert"));
    }

    #[tokio::test]
    async fn test_upload_returns_xspf_attachment() {
        let jspf = br#"{"playlist": {"title": "Mix", "track": [{"title": "Song A", "location": "file:///a.mp3"}]}}"#;
        let (status, headers, body) =
            send(app(), upload_request("jspfFile", "mix.jspf", jspf)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], XSPF_CONTENT_TYPE);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"mix.xspf\"; filename*=UTF-8''mix.xspf"
        );

        let xml = String::from_utf8(body).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<title>Song A</title>"));
        assert!(xml.contains("<location>file:///a.mp3</location>"));
    }

    #[tokio::test]
    async fn test_upload_accepts_short_field_name() {
        let jspf = br#"[{"location": "a.mp3"}]"#;
        let (status, headers, _) = send(app(), upload_request("jspf", "", jspf)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"playlist.xspf\"; filename*=UTF-8''playlist.xspf"
        );
    }

    #[tokio::test]
    async fn test_non_ascii_upload_name_is_percent_encoded() {
        let jspf = br#"[{"location": "joga.flac"}]"#;
        let (status, headers, _) =
            send(app(), upload_request("jspfFile", "Björk.jspf", jspf)).await;

        assert_eq!(status, StatusCode::OK);
        let disposition = headers[header::CONTENT_DISPOSITION].as_bytes();
        assert!(disposition.is_ascii());
        assert_eq!(
            disposition,
            b"attachment; filename=\"Bj_rk.xspf\"; filename*=UTF-8''Bj%C3%B6rk.xspf"
        );
    }

    #[tokio::test]
    async fn test_upload_without_file_is_bad_request() {
        let body = format!("--{BOUNDARY}--\r\n").into_bytes();
        let (status, _, body) = send(app(), multipart_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_empty_file_is_bad_request() {
        let (status, _, _) = send(app(), upload_request("jspfFile", "empty.jspf", b"")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_field_is_bad_request() {
        let (status, _, body) =
            send(app(), upload_request("file", "mix.jspf", b"[]")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"], "Unknown field: file");
    }

    #[tokio::test]
    async fn test_malformed_upload_is_unprocessable() {
        let (status, _, body) =
            send(app(), upload_request("jspfFile", "bad.jspf", b"{\"playlist\": ")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(&body);
        assert_eq!(body["stage"], "parse");
        assert!(body["track"].is_null());
    }

    #[tokio::test]
    async fn test_missing_location_reports_track() {
        let jspf = br#"[{"location": "a"}, {"title": "lost"}]"#;
        let (status, _, body) = send(app(), upload_request("jspfFile", "x.jspf", jspf)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(&body)["track"], 1);
    }

    #[tokio::test]
    async fn test_skip_policy_applies_to_uploads() {
        let app = app_with(AppState {
            options: ConvertOptions {
                missing_location: MissingLocationPolicy::Skip,
            },
            max_upload_bytes: 1024 * 1024,
        });
        let jspf = br#"[{"location": "a"}, {"title": "lost"}]"#;
        let (status, _, body) = send(app, upload_request("jspfFile", "x.jspf", jspf)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(String::from_utf8(body).unwrap().matches("<track>").count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let app = app_with(AppState {
            options: ConvertOptions::default(),
            max_upload_bytes: 256,
        });
        let jspf = format!(r#"[{{"location": "{}"}}]"#, "a".repeat(4096));
        let (status, _, _) =
            send(app, upload_request("jspfFile", "big.jspf", jspf.as_bytes())).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}

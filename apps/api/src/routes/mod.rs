pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::profile;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Multipart framing allowance on top of the document size cap. The handler
/// enforces the cap itself while streaming the upload field.
const MULTIPART_SLACK_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_SLACK_BYTES;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Profile
        .route(
            "/api/profile",
            get(profile::handle_get_profile).put(profile::handle_put_profile),
        )
        // Interview
        .route("/api/interview/start", post(interview::handle_start))
        .route("/api/interview/answer", post(interview::handle_answer))
        .route("/api/interview/finish", post(interview::handle_finish))
        .route("/api/interview/list", get(interview::handle_list))
        .route("/api/interview/:id", get(interview::handle_get))
        // Resume analysis
        .route(
            "/api/resume/analyze",
            post(resume::handle_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/resume/analysis/pdf", post(resume::handle_analysis_pdf))
        .route("/api/resume/analysis/:id", get(resume::handle_get_analysis))
        .route("/api/resume/analyses", get(resume::handle_list_analyses))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::USER_ID_HEADER;
    use crate::config::Config;
    use crate::resume::analyzer::tests::STRONG_RESUME;
    use crate::resume::extract::tests::docx_fixture;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "interviewer-test-boundary";

    fn app() -> Router {
        build_router(AppState::in_memory(Config::default()))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn json_request(method: &str, uri: &str, uid: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(uid) = uid {
            builder = builder.header(USER_ID_HEADER, uid);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, uid: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(uid) = uid {
            builder = builder.header(USER_ID_HEADER, uid);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn upload_request(filename: &str, bytes: &[u8], uid: Option<&str>) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/resume/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(uid) = uid {
            builder = builder.header(USER_ID_HEADER, uid);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn resume_docx() -> Vec<u8> {
        let paragraphs: Vec<&str> = STRONG_RESUME.lines().collect();
        docx_fixture(&paragraphs)
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = app();
        let (status, body) = send_json(&app, get_request("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (_, body) = send_json(&app, get_request("/", None)).await;
        assert_eq!(body["message"], "AI Interviewer API running");
    }

    #[tokio::test]
    async fn test_protected_route_requires_user_header() {
        let (status, body) = send_json(&app(), get_request("/api/profile", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_profile_merge_keeps_existing_fields() {
        let app = app();
        let (_, empty) = send_json(&app, get_request("/api/profile", Some("u1"))).await;
        assert_eq!(empty, json!({}));

        let (status, ok) = send_json(
            &app,
            json_request("PUT", "/api/profile", Some("u1"), json!({ "name": "Ada", "role": "dev" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ok, json!({ "ok": true }));

        send(
            &app,
            json_request("PUT", "/api/profile", Some("u1"), json!({ "role": "lead", "about": null })),
        )
        .await;

        let (_, profile) = send_json(&app, get_request("/api/profile", Some("u1"))).await;
        assert_eq!(profile, json!({ "name": "Ada", "role": "lead" }));
    }

    #[tokio::test]
    async fn test_interview_round_trip() {
        let app = app();
        let (status, started) = send_json(
            &app,
            json_request(
                "POST",
                "/api/interview/start",
                Some("u1"),
                json!({ "role": "Backend Engineer", "difficulty": "hard", "mode": "text" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["first_question"], "Why do you want the role Backend Engineer?");
        let id = started["interview_id"].as_str().unwrap().to_string();

        let (_, answered) = send_json(
            &app,
            json_request(
                "POST",
                "/api/interview/answer",
                Some("u1"),
                json!({ "interview_id": id, "question": "Why?", "answer": "Impact." }),
            ),
        )
        .await;
        assert_eq!(answered["score"], 72);
        assert_eq!(answered["done"], false);
        assert_eq!(answered["components"]["confidence"], 72);

        let (_, report) = send_json(
            &app,
            json_request("POST", "/api/interview/finish", Some("u1"), json!({ "interview_id": id })),
        )
        .await;
        assert_eq!(report["score"], 72);
        assert_eq!(report["components"]["communication"], 67);
        assert_eq!(report["components"]["confidence"], 69);

        let (_, listed) = send_json(&app, get_request("/api/interview/list", Some("u1"))).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], id.as_str());
        assert_eq!(listed[0]["status"], "finished");

        let (status, body) =
            send_json(&app, get_request(&format!("/api/interview/{id}"), Some("u2"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Not found");
    }

    #[tokio::test]
    async fn test_analyze_persists_for_identified_caller() {
        let app = app();
        let (status, body) =
            send_json(&app, upload_request("resume.docx", &resume_docx(), Some("u1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Resume analyzed successfully");
        assert_eq!(body["analysis"]["sections"]["contact"], 95);
        let id = body["analysisId"].as_str().unwrap().to_string();

        let (_, listed) = send_json(&app, get_request("/api/resume/analyses", Some("u1"))).await;
        assert_eq!(listed[0]["id"], id.as_str());
        assert_eq!(listed[0]["filename"], "resume.docx");

        let (status, stored) = send_json(
            &app,
            get_request(&format!("/api/resume/analysis/{id}"), Some("u1")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["analysis"], body["analysis"]);

        let (status, missing) = send_json(
            &app,
            get_request(&format!("/api/resume/analysis/{id}"), Some("u2")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["error"]["message"], "Analysis not found");
    }

    #[tokio::test]
    async fn test_anonymous_analyze_is_not_persisted() {
        let state = AppState::in_memory(Config::default());
        let store = state.store.clone();
        let app = build_router(state);

        let (status, _) = send_json(&app, upload_request("cv.docx", &resume_docx(), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(store
            .list_by_owner(crate::store::Collection::ResumeAnalyses, "")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_analyze_error_statuses() {
        let app = app();

        let (status, body) = send_json(&app, upload_request("resume.txt", b"text", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");

        let blank = docx_fixture(&["  "]);
        let (status, body) = send_json(&app, upload_request("resume.docx", &blank, None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EMPTY_DOCUMENT");

        let (status, body) =
            send_json(&app, upload_request("resume.pdf", b"not a pdf", None)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "EXTRACTION_FAILED");
    }

    #[tokio::test]
    async fn test_analyze_rejects_oversized_upload() {
        let config = Config {
            max_upload_bytes: 64,
            ..Config::default()
        };
        let app = build_router(AppState::in_memory(config));

        let (status, body) =
            send_json(&app, upload_request("resume.docx", &resume_docx(), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "OVERSIZED_INPUT");
    }

    #[tokio::test]
    async fn test_upload_far_beyond_cap_is_oversized() {
        let config = Config {
            max_upload_bytes: 64,
            ..Config::default()
        };
        let app = build_router(AppState::in_memory(config));

        // Larger than cap plus multipart slack.
        let huge = vec![0u8; 2 * 1024 * 1024];
        let (status, body) = send_json(&app, upload_request("resume.docx", &huge, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "OVERSIZED_INPUT");
    }

    #[tokio::test]
    async fn test_oversized_file_with_bad_extension_is_unsupported() {
        let config = Config {
            max_upload_bytes: 64,
            ..Config::default()
        };
        let app = build_router(AppState::in_memory(config));

        let (status, body) =
            send_json(&app, upload_request("resume.txt", &[b'a'; 4096], None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_analyze_without_file_field_is_bad_request() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{BOUNDARY}--\r\n"
        );
        let req = Request::builder()
            .method("POST")
            .uri("/api/resume/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send_json(&app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_pdf_download_from_partial_analysis() {
        let req = json_request(
            "POST",
            "/api/resume/analysis/pdf",
            None,
            json!({ "overallScore": 82, "strengths": ["Clear layout"] }),
        );
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");

        let disposition = resp.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"resume-analysis-"));
        assert!(disposition.ends_with(".pdf\""));

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF"));
    }
}

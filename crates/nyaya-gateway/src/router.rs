use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, rag_handler, summarize_doc_handler, summarize_text_handler,
};
use super::server::AppState;

pub(crate) fn build_router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route("/RAG", post(rag_handler))
        .route("/summarize-text", post(summarize_text_handler))
        .route("/summarize-doc", post(summarize_doc_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use nyaya_core::language::APOLOGY_NOTICE;
    use nyaya_core::query::QueryPipeline;
    use nyaya_core::summarize::Summarizer;
    use nyaya_index::{FlatIndex, IndexEntry, Retriever};
    use nyaya_llm::any::AnyProvider;
    use nyaya_llm::mock::MockProvider;

    use super::*;

    const BOUNDARY: &str = "test-boundary";

    fn test_state(provider: MockProvider, index: FlatIndex) -> AppState {
        let chunks = index.len();
        let provider = Arc::new(AnyProvider::Mock(provider));
        let retriever = Retriever::new(Arc::new(index), Arc::clone(&provider));
        AppState {
            pipeline: Arc::new(QueryPipeline::new(retriever, Arc::clone(&provider))),
            summarizer: Arc::new(Summarizer::new(Arc::clone(&provider), provider)),
            chunks,
        }
    }

    fn test_router(provider: MockProvider) -> Router {
        build_router(test_state(provider, FlatIndex::new()), 1_048_576)
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn multipart_request(uri: &str, name: &str, filename: Option<&str>, content: &str) -> Request<Body> {
        let disposition = match filename {
            Some(f) => format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\""),
            None => format!("Content-Disposition: form-data; name=\"{name}\""),
        };
        let body =
            format!("--{BOUNDARY}\r\n{disposition}\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n");
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_reports_chunk_count() {
        let mut index = FlatIndex::new();
        for i in 0..3 {
            index.insert(IndexEntry {
                vector: vec![1.0, 0.0],
                content: format!("chunk {i}"),
                source: "ipc.pdf".into(),
                content_type: "application/pdf".into(),
                chunk_index: i,
            });
        }
        let app = build_router(test_state(MockProvider::new(), index), 1_048_576);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["chunks"], 3);
    }

    #[tokio::test]
    async fn rag_answers_query() {
        let provider = MockProvider::with_responses(vec![
            "- Predicted Offense: Theft\n- Relevant Legal Section: Section 378".into(),
        ]);
        let app = test_router(provider);

        let req = json_request(
            "/RAG",
            serde_json::json!({"query": "What is theft?", "language": "en"}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        assert_eq!(json["query"], "What is theft?");
        assert!(json["response"].as_str().unwrap().contains("Section 378"));
    }

    #[tokio::test]
    async fn rag_non_baseline_mismatch_prepends_notice() {
        let canned =
            "The punishment for theft is imprisonment which may extend to three years, or a fine, or both.";
        let provider = MockProvider::with_responses(vec![canned.into()]);
        let app = test_router(provider);

        let req = json_request(
            "/RAG",
            serde_json::json!({"query": "What is the punishment for theft?", "language": "ta"}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        let response = json["response"].as_str().unwrap();
        assert!(response.starts_with(APOLOGY_NOTICE));
        assert!(response.ends_with(canned));
    }

    #[tokio::test]
    async fn rag_empty_query_is_rejected() {
        let app = test_router(MockProvider::new());
        let req = json_request("/RAG", serde_json::json!({"query": "   "}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 400);
        let json = json_body(resp).await;
        assert_eq!(json["error"], "Query cannot be empty.");
    }

    #[tokio::test]
    async fn rag_missing_query_field_is_rejected() {
        let app = test_router(MockProvider::new());
        let req = json_request("/RAG", serde_json::json!({}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn rag_generation_failure_is_server_error() {
        let app = test_router(MockProvider::failing());
        let req = json_request("/RAG", serde_json::json!({"query": "What is theft?"}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 500);
        let json = json_body(resp).await;
        assert!(json["error"].as_str().unwrap().contains("generation failed"));
    }

    #[tokio::test]
    async fn summarize_text_accepts_json() {
        let provider = MockProvider::with_responses(vec!["A short summary.".into()]);
        let app = test_router(provider);

        let req = json_request(
            "/summarize-text",
            serde_json::json!({"text": "Theft is punishable under Section 378."}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        assert_eq!(json["summary"], "A short summary.");
    }

    #[tokio::test]
    async fn summarize_text_accepts_form() {
        let provider = MockProvider::with_responses(vec!["A short summary.".into()]);
        let app = test_router(provider);

        let req = Request::builder()
            .method("POST")
            .uri("/summarize-text")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("text=Theft+is+punishable+under+Section+378."))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        assert_eq!(json["summary"], "A short summary.");
    }

    #[tokio::test]
    async fn summarize_text_empty_is_rejected() {
        let app = test_router(MockProvider::new());
        let req = json_request("/summarize-text", serde_json::json!({"text": ""}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 400);
        let json = json_body(resp).await;
        assert_eq!(json["error"], "Text input cannot be empty.");
    }

    #[tokio::test]
    async fn summarize_doc_accepts_txt_upload() {
        let provider = MockProvider::with_responses(vec!["A document summary.".into()]);
        let app = test_router(provider);

        let req = multipart_request(
            "/summarize-doc",
            "file",
            Some("note.txt"),
            "Theft is punishable under Section 378 with imprisonment.",
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);
        let json = json_body(resp).await;
        assert_eq!(json["summary"], "A document summary.");
    }

    #[tokio::test]
    async fn summarize_doc_without_file_field_is_rejected() {
        let app = test_router(MockProvider::new());
        let req = multipart_request("/summarize-doc", "attachment", Some("note.txt"), "text");
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 400);
        let json = json_body(resp).await;
        assert_eq!(json["error"], "Please provide a document file.");
    }

    #[tokio::test]
    async fn summarize_doc_unsupported_type_is_rejected() {
        let app = test_router(MockProvider::new());
        let req = multipart_request("/summarize-doc", "file", Some("photo.png"), "not text");
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 400);
        let json = json_body(resp).await;
        assert_eq!(json["error"], "Unsupported file type.");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = build_router(test_state(MockProvider::new(), FlatIndex::new()), 64);
        let oversized = "x".repeat(128);
        let req = json_request("/RAG", serde_json::json!({"query": oversized}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 413);
    }

    #[tokio::test]
    async fn preflight_allows_any_origin() {
        let app = test_router(MockProvider::new());
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/RAG")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_success());
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }
}

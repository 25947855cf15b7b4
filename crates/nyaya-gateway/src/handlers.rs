use axum::Json;
use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use nyaya_core::error::QueryError;
use nyaya_corpus::{CorpusError, extract_upload};

use super::server::AppState;

#[derive(serde::Deserialize)]
pub(crate) struct RagPayload {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(serde::Deserialize)]
pub(crate) struct SummarizeTextPayload {
    #[serde(default)]
    pub text: String,
}

#[derive(serde::Serialize)]
struct RagResponse {
    query: String,
    response: String,
}

#[derive(serde::Serialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    chunks: usize,
}

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
}

pub(crate) async fn rag_handler(
    State(state): State<AppState>,
    Json(payload): Json<RagPayload>,
) -> Response {
    match state
        .pipeline
        .answer(&payload.query, payload.language.as_deref())
        .await
    {
        Ok(answer) => Json(RagResponse {
            query: answer.query,
            response: answer.response,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn summarize_text_handler(
    State(state): State<AppState>,
    req: Request,
) -> Response {
    let text = text_field(req).await;
    match state.summarizer.summarize(&text).await {
        Ok(summary) => Json(SummaryResponse { summary }).into_response(),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn summarize_doc_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let (filename, bytes) = match file_part(&mut multipart).await {
        Ok(part) => part,
        Err(e) => return error_response(&e),
    };

    let extracted = tokio::task::spawn_blocking(move || extract_upload(&filename, &bytes)).await;
    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(CorpusError::UnsupportedFormat(_))) => {
            return error_response(&QueryError::UnsupportedFileType);
        }
        Ok(Err(e)) => return error_response(&QueryError::Extraction(e.to_string())),
        Err(e) => return error_response(&QueryError::Extraction(e.to_string())),
    };

    match state.summarizer.summarize(&text).await {
        Ok(summary) => Json(SummaryResponse { summary }).into_response(),
        Err(e) => error_response(&e),
    }
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        chunks: state.chunks,
    })
}

/// Pull the `text` field from a JSON or urlencoded-form body. Anything
/// unparseable yields an empty string, which the summarizer rejects.
async fn text_field(req: Request) -> String {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        match Json::<SummarizeTextPayload>::from_request(req, &()).await {
            Ok(Json(payload)) => payload.text,
            Err(_) => String::new(),
        }
    } else {
        match Form::<SummarizeTextPayload>::from_request(req, &()).await {
            Ok(Form(payload)) => payload.text,
            Err(_) => String::new(),
        }
    }
}

/// First `file` part of the upload, as (file name, body).
async fn file_part(multipart: &mut Multipart) -> Result<(String, Bytes), QueryError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| QueryError::Extraction(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| QueryError::Extraction(e.to_string()))?;
            return Ok((filename, bytes));
        }
    }
    Err(QueryError::MissingFile)
}

fn error_response(error: &QueryError) -> Response {
    let status = if error.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!(%error, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

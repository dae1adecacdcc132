use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::transcribe::transcribe_in_worker;
use super::AppState;
use super::error::HttpError;
use super::upload::{read_video_field, stage_upload, UploadedVideo};

pub const PLAIN_TEXT_UTF8: &str = "text/plain; charset=utf-8";

pub async fn transcribe_video(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Response, HttpError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("transcribe", %request_id);

    async move {
        let upload = match multipart {
            Ok(multipart) => read_video_field(multipart).await,
            Err(rejection) => Err(HttpError::from(rejection)),
        }
        .inspect_err(|error| {
            tracing::warn!(?error, "rejected transcribe request");
        })?;

        tracing::info!(
            file_name = upload.file_name.as_deref().unwrap_or("unnamed"),
            content_type = %upload.content_type,
            size_bytes = upload.bytes.len(),
            "received transcribe request"
        );

        match stage_and_transcribe(&state, upload).await {
            Ok(subtitles) => {
                tracing::info!(subtitle_bytes = subtitles.len(), "transcribe request completed");
                Ok((StatusCode::OK, [(header::CONTENT_TYPE, PLAIN_TEXT_UTF8)], subtitles)
                    .into_response())
            }
            Err(error) => {
                tracing::error!(error = %error, "transcribe request failed");
                Err(HttpError::from(error))
            }
        }
    }
    .instrument(span)
    .await
}

async fn stage_and_transcribe(state: &AppState, upload: UploadedVideo) -> Result<String> {
    let transcriber = state.transcriber.clone();
    let bytes = upload.bytes;
    let staged = tokio::task::spawn_blocking(move || stage_upload(&bytes, &transcriber))
        .await??;

    // `staged` is dropped, and the file deleted, when this returns.
    transcribe_in_worker(state.tool.clone(), staged.path().to_path_buf()).await
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

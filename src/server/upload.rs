use std::io::Write;

use axum::body::Bytes;
use axum::extract::Multipart;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::TranscriberConfig;
use crate::error::{Result, ServiceError};
use super::error::HttpError;

/// Multipart field carrying the video
pub const VIDEO_FIELD: &str = "video";

#[derive(Debug)]
pub struct UploadedVideo {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Accept only declared `video/*` content types.
pub fn ensure_video_content_type(content_type: Option<&str>) -> Result<&str> {
    match content_type {
        Some(content_type) if content_type.starts_with("video/") => Ok(content_type),
        Some(content_type) => Err(ServiceError::InvalidInput(format!(
            "Not video. Expected a video/* upload, got '{}'",
            content_type
        ))),
        None => Err(ServiceError::InvalidInput(
            "Not video. The upload has no content type".to_string(),
        )),
    }
}

/// Pull the video field out of the form. The content type is checked before
/// the body is read.
pub async fn read_video_field(mut multipart: Multipart) -> std::result::Result<UploadedVideo, HttpError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(VIDEO_FIELD) {
            debug!("Skipping form field {:?}", field.name());
            continue;
        }

        let content_type = ensure_video_content_type(field.content_type())?.to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;

        return Ok(UploadedVideo {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(ServiceError::InvalidInput(format!("Missing '{}' file field", VIDEO_FIELD)).into())
}

/// Write the upload to a uniquely named file that is deleted when dropped.
pub fn stage_upload(bytes: &[u8], config: &TranscriberConfig) -> Result<NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&config.video_suffix)
        .tempfile_in(config.ensure_scratch_root()?)?;

    staged.write_all(bytes)?;
    staged.flush()?;

    info!("Staged {} bytes at {}", bytes.len(), staged.path().display());
    Ok(staged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_types_are_accepted() {
        assert_eq!(ensure_video_content_type(Some("video/mp4")).unwrap(), "video/mp4");
        assert!(ensure_video_content_type(Some("video/x-matroska")).is_ok());
    }

    #[test]
    fn other_types_are_client_errors() {
        for content_type in ["audio/mpeg", "text/plain", "application/octet-stream", "Video/mp4"] {
            let err = ensure_video_content_type(Some(content_type)).unwrap_err();
            assert!(err.is_client_error(), "{content_type} should be rejected");
        }
        assert!(ensure_video_content_type(None).unwrap_err().is_client_error());
    }

    #[test]
    fn staged_file_has_suffix_and_is_removed_on_drop() {
        let scratch = tempfile::tempdir().unwrap();
        let config = TranscriberConfig {
            scratch_dir: Some(scratch.path().to_path_buf()),
            ..TranscriberConfig::default()
        };

        let staged = stage_upload(b"frames", &config).unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(path.parent(), Some(scratch.path()));
        assert!(path.to_string_lossy().ends_with(".mp4"));
        assert_eq!(std::fs::read(&path).unwrap(), b"frames");

        drop(staged);
        assert!(!path.exists());
    }
}

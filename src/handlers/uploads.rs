use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::path::{Path as FsPath, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image_url: String,
}

/// Accepts a single multipart `file` field; image content types only.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(ServiceError::Validation("File must be an image".to_string()));
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit('.').next())
            .unwrap_or("bin")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = PathBuf::from(&state.config.upload_dir).join(&filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ServiceError::Internal(format!("failed to store upload: {e}")))?;

        info!(%filename, size = bytes.len(), "image uploaded");
        return Ok(Json(UploadResponse {
            image_url: format!("/api/uploads/{filename}"),
        }));
    }

    Err(ServiceError::Validation("Missing file field".to_string()))
}

/// Serves a previously uploaded file by its generated name.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    if !is_safe_filename(&filename) {
        return ServiceError::NotFound("File".to_string()).into_response();
    }

    let path = FsPath::new(&state.config.upload_dir).join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type_for(&filename))], bytes).into_response(),
        Err(_) => ServiceError::NotFound("File".to_string()).into_response(),
    }
}

// Generated names are `<uuid>.<ext>`; anything that could walk out of the
// upload directory is treated as absent.
fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\'])
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit('.')
        .next()
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_and_separator_names() {
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename(".."));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename("a\\b.png"));
        assert!(is_safe_filename("3e2c5f7a.png"));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("archive.tar"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    infrastructure::storage::{ArtifactStore, ARTIFACT_PREFIX},
};

pub struct DownloadController {
    store: ArtifactStore,
}

impl DownloadController {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    /// GET /download/:filename and /api/download/:filename - Serve a finished meditation
    pub async fn download(
        State(controller): State<Arc<DownloadController>>,
        Path(filename): Path<String>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let path = controller
            .store
            .resolve(&filename)
            .ok_or_else(|| AppError::NotFound(format!("File not found: {}", filename)))?;

        let audio = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("File not found: {}", filename))
            } else {
                AppError::from(e)
            }
        })?;

        tracing::info!(
            artifact = %filename,
            size_bytes = audio.len(),
            "Serving meditation download"
        );

        let disposition = format!("attachment; filename=\"{}{}\"", ARTIFACT_PREFIX, filename);
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("audio/wav"));
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition)
                .map_err(|e| AppError::Internal(format!("invalid download header: {}", e)))?,
        );

        Ok((StatusCode::OK, headers, Body::from(audio)))
    }
}

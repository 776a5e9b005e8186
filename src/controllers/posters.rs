use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, FromRef, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::path::Path;

use crate::{
    config::UploadConfig,
    error::{AppError, AppResult},
    middleware::{AdminUser, JwtKeys},
    services::posters,
};

const FIELD_NAME: &str = "poster";

/// `POST /upload-poster`. Generic over the state so it can be mounted on
/// any router that provides the upload settings and JWT keys.
pub fn routes<S>(max_poster_bytes: usize) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    UploadConfig: FromRef<S>,
    JwtKeys: FromRef<S>,
{
    Router::new()
        .route("/upload-poster", post(upload_poster))
        .layer(DefaultBodyLimit::max(max_poster_bytes))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

fn invalid_form() -> AppError {
    AppError::bad_request("invalid form or file too large")
}

async fn upload_poster(
    _admin: AdminUser,
    State(upload): State<UploadConfig>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|_| invalid_form())?;

    while let Some(field) = multipart.next_field().await.map_err(|_| invalid_form())? {
        if field.name() != Some(FIELD_NAME) {
            continue;
        }
        // Поле без filename это обычное значение формы, а не файл
        let Some(original) = field.file_name().map(str::to_string) else {
            continue;
        };
        // Расширение проверяем до чтения тела
        posters::safe_poster_name(&original)?;

        let bytes = field.bytes().await.map_err(|_| invalid_form())?;
        let url = posters::save_poster(Path::new(&upload.posters_dir), &original, &bytes).await?;
        return Ok(Json(UploadResponse { url }));
    }

    Err(AppError::bad_request("missing file field 'poster'"))
}

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::error::AppError;

const ALLOWED_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

#[derive(Debug, Error)]
pub enum PosterError {
    #[error("allowed: jpg, png, gif, webp")]
    UnsupportedExtension,

    #[error("failed to save file")]
    Io(#[from] std::io::Error),
}

impl From<PosterError> for AppError {
    fn from(err: PosterError) -> Self {
        match err {
            PosterError::UnsupportedExtension => AppError::bad_request(err.to_string()),
            PosterError::Io(e) => AppError::Internal(anyhow::Error::new(e).context("failed to save file")),
        }
    }
}

/// Turns an uploaded file name into a safe one: the extension is lower-cased
/// and must be an image type, the base name keeps only ASCII letters, digits,
/// `-` and `_`.
pub fn safe_poster_name(original: &str) -> Result<String, PosterError> {
    // Берём только последний компонент пути, клиент может прислать что угодно
    let file_name = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let (base, ext) = match file_name.rfind('.') {
        Some(dot) => (&file_name[..dot], file_name[dot..].to_ascii_lowercase()),
        None => (file_name, String::new()),
    };
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(PosterError::UnsupportedExtension);
    }

    let mut safe: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if safe.is_empty() {
        safe = "poster".to_string();
    }
    Ok(format!("{safe}{ext}"))
}

/// Writes the poster into `dir`, replacing a file of the same name, and
/// returns the public URL it is served under.
pub async fn save_poster(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String, PosterError> {
    let name = safe_poster_name(original_name)?;
    fs::create_dir_all(dir).await?;

    let path: PathBuf = dir.join(&name);
    if let Err(e) = fs::write(&path, bytes).await {
        let _ = fs::remove_file(&path).await;
        return Err(e.into());
    }

    info!("Poster saved: {} ({} bytes)", path.display(), bytes.len());
    Ok(format!("/posters/{name}"))
}

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// URL prefix under which `media_root` is served.
pub const MEDIA_URL: &str = "/media";

const RECIPE_UPLOAD_DIR: &str = "uploads/recipe";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Relative storage path for a new recipe image: `uploads/recipe/<uuid>.<ext>`.
pub fn recipe_image_file_path(filename: &str) -> String {
    recipe_image_file_path_with(filename, Uuid::new_v4())
}

fn recipe_image_file_path_with(filename: &str, id: Uuid) -> String {
    match extension(filename) {
        Some(ext) => format!("{RECIPE_UPLOAD_DIR}/{id}.{ext}"),
        None => format!("{RECIPE_UPLOAD_DIR}/{id}"),
    }
}

pub fn is_image_filename(filename: &str) -> bool {
    extension(filename)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn url_for(relative: &str) -> String {
    format!("{MEDIA_URL}/{relative}")
}

fn extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
}

/// Write `data` to `media_root/relative`, creating parent directories.
pub async fn save(media_root: &Path, relative: &str, data: &[u8]) -> Result<PathBuf, String> {
    let full = media_root.join(relative);
    if let Some(parent) = full.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    tokio::fs::write(&full, data)
        .await
        .map_err(|e| format!("Failed to write {}: {e}", full.display()))?;
    Ok(full)
}

/// Best-effort removal of a previously stored file.
pub async fn remove(media_root: &Path, relative: &str) {
    let full = media_root.join(relative);
    if let Err(e) = tokio::fs::remove_file(&full).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove {}: {e}", full.display());
        }
    }
}

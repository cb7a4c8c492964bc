/// Gallery image payloads
///
/// Gallery records keep their picture inline as a
/// `data:<mime>;base64,<payload>` URL. This module builds those URLs from
/// image files, decodes them back for display/download, and imports whole
/// folders in the background.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task;
use walkdir::WalkDir;

use crate::error::MediaError;
use crate::state::data::ImageDraft;

/// Extensions picked up by `import_folder`
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Encode raw image bytes as a data URL, sniffing the format from its header
pub fn encode_data_url(bytes: &[u8]) -> Result<String, MediaError> {
    let format = image::guess_format(bytes).map_err(|_| MediaError::UnknownFormat)?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        B64.encode(bytes)
    ))
}

/// Split a data URL into its MIME type and decoded bytes
pub fn decode_data_url(src: &str) -> Result<(String, Vec<u8>), MediaError> {
    let rest = src.strip_prefix("data:").ok_or(MediaError::NotADataUrl)?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or(MediaError::NotADataUrl)?;
    let bytes = B64.decode(payload.trim())?;
    Ok((mime.to_string(), bytes))
}

/// Read one image file into a gallery draft named after the file
pub fn image_draft_from_file(path: &Path) -> Result<ImageDraft, MediaError> {
    let bytes = fs::read(path).map_err(|source| MediaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(ImageDraft {
        src: encode_data_url(&bytes)?,
        name,
    })
}

/// Result of a folder import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub drafts: Vec<ImageDraft>,
    /// Files with an image extension that could not be read or recognized
    pub skipped_count: usize,
}

/// Import every image under `folder_path`.
/// Runs on a blocking thread so the UI stays responsive.
pub async fn import_folder(folder_path: PathBuf) -> ImportResult {
    let path_for_log = folder_path.clone();
    task::spawn_blocking(move || import_folder_blocking(&folder_path))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("❌ Import of {} aborted: {}", path_for_log.display(), e);
            ImportResult::default()
        })
}

/// Blocking implementation of the folder import
pub fn import_folder_blocking(folder_path: &Path) -> ImportResult {
    let mut result = ImportResult::default();

    tracing::info!("🔍 Scanning folder: {}", folder_path.display());

    // Walk the directory tree recursively
    for entry in WalkDir::new(folder_path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        // Only process files (not directories)
        if !path.is_file() || !has_image_extension(path) {
            continue;
        }

        match image_draft_from_file(path) {
            Ok(draft) => result.drafts.push(draft),
            Err(e) => {
                tracing::warn!("⚠️  Skipping {}: {}", path.display(), e);
                result.skipped_count += 1;
            }
        }
    }

    tracing::info!(
        "✅ Scan complete: {} images, {} skipped",
        result.drafts.len(),
        result.skipped_count
    );

    result
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

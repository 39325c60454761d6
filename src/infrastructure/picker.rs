use crate::error::IntakeError;
use crate::models::RawFile;
use std::path::{Path, PathBuf};

/// Extension fallbacks for formats without reliable magic bytes
fn mime_for_extension(ext: &str) -> Option<mime::Mime> {
    match ext {
        "txt" => Some(mime::TEXT_PLAIN),
        "csv" => Some(mime::TEXT_CSV),
        "htm" | "html" => Some(mime::TEXT_HTML),
        "css" => Some(mime::TEXT_CSS),
        "js" => Some(mime::TEXT_JAVASCRIPT),
        "json" => Some(mime::APPLICATION_JSON),
        "svg" => Some(mime::IMAGE_SVG),
        "pdf" => Some(mime::APPLICATION_PDF),
        "png" => Some(mime::IMAGE_PNG),
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "gif" => Some(mime::IMAGE_GIF),
        "bmp" => Some(mime::IMAGE_BMP),
        _ => None,
    }
}

/// Determines the content type the way a browser picker would report it:
/// magic bytes first, then the extension, else empty.
pub fn detect_mime(name: &str, header: &[u8]) -> String {
    if let Some(kind) = infer::get(header) {
        return kind.mime_type().to_string();
    }

    crate::utils::validation::file_extension(name)
        .and_then(|ext| mime_for_extension(&ext))
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default()
}

/// Reads one picked file into memory
pub async fn load_file(path: &Path) -> Result<RawFile, IntakeError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| IntakeError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IntakeError::io(path, e))?;

    let mime_type = detect_mime(&name, &bytes);
    tracing::debug!("Loaded {} ({} bytes, '{}')", name, bytes.len(), mime_type);

    Ok(RawFile::from_bytes(name, mime_type, bytes))
}

/// Reads picked files in selection order. The first unreadable path aborts.
pub async fn load_files(paths: &[PathBuf]) -> Result<Vec<RawFile>, IntakeError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(load_file(path).await?);
    }
    Ok(files)
}

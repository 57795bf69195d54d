use std::io;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::error::ShareError;
use crate::views::{DirListPage, FileListPage};
use crate::AppState;

/// Query parameters for the browse endpoint
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Shared directory path; must be registered
    pub dir: Option<String>,
}

/// Query parameters for the download endpoint
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Shared directory path; must be registered
    pub dir: Option<String>,
    /// File name inside the directory
    pub file: Option<String>,
}

// ============================================================================
// Helper functions
// ============================================================================

/// Sanitize a requested filename down to a safe base name.
///
/// Keeps only the final path component (discarding separators and any leading
/// traversal sequences), drops control characters, replaces filesystem-hostile
/// characters with `_`, and trims leading/trailing dots and spaces. Returns
/// None if nothing safe remains or the name is a reserved device name.
fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    let cleaned = cleaned.trim_matches(|c| c == '.' || c == ' ');
    if cleaned.is_empty() {
        return None;
    }

    // Reserved Windows names (for cross-platform safety)
    let upper = cleaned.to_uppercase();
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
        "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    if RESERVED
        .iter()
        .any(|r| upper == *r || upper.starts_with(&format!("{}.", r)))
    {
        return None;
    }

    // Limit filename length, respecting char boundaries
    if cleaned.len() > 255 {
        let mut end = 255;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        return Some(cleaned[..end].to_string());
    }

    Some(cleaned.to_string())
}

fn io_error_for(err: io::Error, what: &str) -> ShareError {
    match err.kind() {
        io::ErrorKind::NotFound => ShareError::NotFound(what.to_string()),
        io::ErrorKind::PermissionDenied => ShareError::PermissionDenied(what.to_string()),
        _ => ShareError::Io(err),
    }
}

/// Resolve a sanitized filename inside a shared directory.
///
/// Canonicalizes both the directory and the joined path and requires the
/// result to stay under the directory, so a symlink inside the share cannot
/// hand out files from elsewhere. Returns the canonical path together with
/// the sanitized name to use for Content-Disposition.
fn resolve_in_dir(dir: &Path, raw_name: &str) -> Result<(PathBuf, String), ShareError> {
    let safe_name = sanitize_filename(raw_name).ok_or_else(|| {
        warn!("Rejected invalid filename: {:?}", raw_name);
        ShareError::InvalidFilename(raw_name.to_string())
    })?;

    let canonical_dir = dir
        .canonicalize()
        .map_err(|err| io_error_for(err, &dir.display().to_string()))?;

    let candidate = canonical_dir.join(&safe_name);
    let canonical = candidate
        .canonicalize()
        .map_err(|err| io_error_for(err, &safe_name))?;

    if !canonical.starts_with(&canonical_dir) {
        warn!(
            "Escape attempt: {:?} resolved to {:?} outside {:?}",
            safe_name, canonical, canonical_dir
        );
        return Err(ShareError::Traversal);
    }

    Ok((canonical, safe_name))
}

/// Stream a regular file as an attachment.
async fn send_file(path: &Path, download_name: &str) -> Result<Response, ShareError> {
    let metadata = fs::metadata(path)
        .await
        .map_err(|err| io_error_for(err, download_name))?;

    if !metadata.is_file() {
        return Err(ShareError::NotFound(download_name.to_string()));
    }

    let file = fs::File::open(path)
        .await
        .map_err(|err| io_error_for(err, download_name))?;
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let mime = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let safe_filename = download_name.replace('"', "'");

    info!("Sending file: {} ({} bytes)", path.display(), metadata.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", safe_filename),
            ),
        ],
        body,
    )
        .into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> &'static str {
    "ok"
}

/// GET / - Directory overview, or the file listing when exactly one
/// directory is shared.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ShareError> {
    if let Some(dir) = state.registry.sole() {
        let files = state.registry.list_files(dir, state.config.show_hidden)?;
        let dir_display = dir.display().to_string();
        let page = FileListPage {
            title: &state.config.title,
            dir: &dir_display,
            files: &files,
            query_links: false,
        };
        return Ok(Html(page.render()));
    }

    let dirs: Vec<_> = state
        .registry
        .dirs()
        .iter()
        .map(|dir| state.registry.describe(dir))
        .collect();

    debug!("Rendering overview of {} directories", dirs.len());

    let page = DirListPage {
        title: &state.config.title,
        dirs: &dirs,
    };
    Ok(Html(page.render()))
}

/// GET /browse?dir= - File listing for one registered directory
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Html<String>, ShareError> {
    let dir = query.dir.ok_or(ShareError::MissingParameter("dir"))?;
    let dir_path = PathBuf::from(&dir);

    let files = state
        .registry
        .list_files(&dir_path, state.config.show_hidden)?;

    debug!("Listing {} files in {}", files.len(), dir);

    let page = FileListPage {
        title: &state.config.title,
        dir: &dir,
        files: &files,
        query_links: true,
    };
    Ok(Html(page.render()))
}

/// GET /download?dir=&file= - Stream one file from a registered directory
/// as an attachment.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ShareError> {
    let dir = query.dir.ok_or(ShareError::MissingParameter("dir"))?;
    let file = query.file.ok_or(ShareError::MissingParameter("file"))?;

    let dir_path = PathBuf::from(&dir);

    // Registry membership gates every filesystem access.
    if !state.registry.contains(&dir_path) {
        warn!("Download from unregistered directory refused: {}", dir);
        return Err(ShareError::Forbidden(dir));
    }

    let (path, name) = resolve_in_dir(&dir_path, &file)?;
    send_file(&path, &name).await
}

/// GET /download/:filename - Single-directory download route.
///
/// Only meaningful when exactly one directory is shared; 404 otherwise.
pub async fn download_named(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> Result<Response, ShareError> {
    let dir = state.registry.sole().ok_or_else(|| {
        warn!("/download/:filename requires exactly one shared directory");
        ShareError::NotFound(filename.clone())
    })?;

    let (path, name) = resolve_in_dir(dir, &filename)?;
    send_file(&path, &name).await
}

//! MIME type detection for media files.
//!
//! Used by the folder source to label items and pick their media kind.

use std::path::Path;

use tgup_core::MediaKind;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "heic"         => "image/heic",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",

        // Audio
        "mp3"          => "audio/mpeg",
        "ogg" | "oga"  => "audio/ogg",
        "m4a"          => "audio/mp4",
        "opus"         => "audio/opus",
        "flac"         => "audio/flac",

        // Video
        "mp4" | "m4v"  => "video/mp4",
        "webm"         => "video/webm",
        "mkv"          => "video/x-matroska",
        "mov"          => "video/quicktime",
        "avi"          => "video/x-msvideo",
        "3gp"          => "video/3gpp",

        // Documents
        "pdf"          => "application/pdf",
        "zip"          => "application/zip",
        "txt"          => "text/plain",

        _              => "application/octet-stream",
    }
}

/// Media kind implied by a MIME type.
///
/// Animated GIFs are treated as photos; everything outside `video/*` and
/// `image/*` is a generic document.
pub fn kind_for_mime(mime: &str) -> MediaKind {
    if is_video(mime) {
        MediaKind::Video
    } else if is_image(mime) {
        MediaKind::Photo
    } else {
        MediaKind::Document
    }
}

pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

pub fn is_video(mime: &str) -> bool {
    mime.starts_with("video/")
}

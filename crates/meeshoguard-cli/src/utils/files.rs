//! Turning paths on disk into admission descriptors.

use std::fs;
use std::path::Path;

use meeshoguard_core::{FileDescriptor, PDF_MEDIA_TYPE};

use crate::error::CliError;

/// Fallback for unknown extensions.
const OCTET_STREAM: &str = "application/octet-stream";

/// Guess a media type from the file extension.
pub fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        _ => OCTET_STREAM,
    }
}

/// Describe a regular file for admission.
///
/// The name is the final path component; size comes from file metadata.
pub fn describe_file(path: &Path) -> Result<FileDescriptor, CliError> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    if !metadata.is_file() {
        return Err(CliError::Arguments(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let name = path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );

    Ok(FileDescriptor::new(
        name,
        metadata.len(),
        guess_media_type(path),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type(Path::new("a.pdf")), PDF_MEDIA_TYPE);
        assert_eq!(guess_media_type(Path::new("A.PDF")), PDF_MEDIA_TYPE);
        assert_eq!(guess_media_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_media_type(Path::new("README")), OCTET_STREAM);
    }

    #[test]
    fn test_describe_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipment.pdf");
        fs::write(&path, vec![0_u8; 1536]).unwrap();

        let file = describe_file(&path).unwrap();
        assert_eq!(file.name, "shipment.pdf");
        assert_eq!(file.size_bytes, 1536);
        assert_eq!(file.media_type, PDF_MEDIA_TYPE);
    }

    #[test]
    fn test_describe_missing_file() {
        let err = describe_file(Path::new("/nonexistent/label.pdf")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_describe_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = describe_file(dir.path()).unwrap_err();
        assert!(matches!(err, CliError::Arguments(_)));
    }
}

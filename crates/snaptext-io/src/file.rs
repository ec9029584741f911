use std::path::Path;

use anyhow::{Context, Result};
use snaptext_core::SelectionError;
use snaptext_core::selection::is_image_media_type;
use snaptext_types::ImageCandidate;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Read a file from disk as a selection candidate.
///
/// The media type is declared from the extension only, the way a browser file
/// picker would; the controller decides whether it is acceptable. Files over
/// `max_bytes` are rejected from their metadata without being read, with the
/// same [`SelectionError`] the controller would report.
pub async fn load_candidate(path: &Path, max_bytes: u64) -> Result<ImageCandidate> {
    let media_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MEDIA_TYPE);

    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    if size > max_bytes {
        tracing::warn!("Not reading {} ({} bytes)", path.display(), size);
        let err = if is_image_media_type(media_type) {
            SelectionError::TooLarge {
                size,
                limit: max_bytes,
            }
        } else {
            SelectionError::UnsupportedType {
                media_type: media_type.to_string(),
            }
        };
        return Err(err.into());
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!("Loaded {} as {} ({} bytes)", name, media_type, bytes.len());
    Ok(ImageCandidate::new(name, media_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 5 * 1024 * 1024;

    #[tokio::test]
    async fn test_media_type_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("shot.png");
        let notes = dir.path().join("notes.txt");
        std::fs::write(&png, [1u8, 2, 3]).unwrap();
        std::fs::write(&notes, "hello").unwrap();

        let image = load_candidate(&png, LIMIT).await.unwrap();
        assert_eq!(image.name, "shot.png");
        assert_eq!(image.media_type, "image/png");
        assert_eq!(image.size(), 3);

        let text = load_candidate(&notes, LIMIT).await.unwrap();
        assert_eq!(text.media_type, "text/plain");
    }

    #[tokio::test]
    async fn test_unknown_extension_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let blob = dir.path().join("payload");
        std::fs::write(&blob, [0u8; 8]).unwrap();

        let candidate = load_candidate(&blob, LIMIT).await.unwrap();
        assert_eq!(candidate.media_type, FALLBACK_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let err = load_candidate(Path::new("/definitely/not/here.jpg"), LIMIT)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("here.jpg"));
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("scan.png");
        std::fs::write(&big, vec![0u8; 2048]).unwrap();

        let err = load_candidate(&big, 1024).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SelectionError>(),
            Some(&SelectionError::TooLarge {
                size: 2048,
                limit: 1024
            })
        );
        assert_eq!(
            err.to_string(),
            SelectionError::TooLarge {
                size: 2048,
                limit: 1024
            }
            .to_string()
        );

        let exact = load_candidate(&big, 2048).await.unwrap();
        assert_eq!(exact.size(), 2048);
    }

    #[tokio::test]
    async fn test_oversized_non_image_reports_type_first() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("manual.pdf");
        std::fs::write(&doc, vec![0u8; 2048]).unwrap();

        let err = load_candidate(&doc, 1024).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SelectionError>(),
            Some(SelectionError::UnsupportedType { .. })
        ));
    }
}

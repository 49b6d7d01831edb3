//! Image ingestion: the OCR engine seam and the upload-to-document
//! pipeline.
//!
//! The recognition engine is a black box behind [`OcrEngine`]; this module
//! owns everything around it — staging the upload to a temporary file,
//! bounding the engine's runtime, normalizing its raw text, and wrapping
//! the result as a structured document.

pub mod document;
pub mod normalize;
pub mod tesseract;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use self::document::TextDocument;

/// OCR pipeline errors.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("No image supplied")]
    MissingImage,

    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("OCR engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Black-box text recognition over an image file on disk.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in the image at `path`, using the given language
    /// model (ISO 639-2 code, e.g. `por`).
    async fn recognize(&self, path: &Path, lang: &str) -> Result<String, OcrError>;
}

/// Run the full ingestion pipeline over raw uploaded bytes.
///
/// The bytes are staged to a temporary file for the engine's benefit. The
/// file is owned by this call frame and removed on every exit path —
/// success, engine failure, or timeout — when the guard drops.
pub async fn process_image(
    engine: &dyn OcrEngine,
    bytes: &[u8],
    lang: &str,
    timeout: Duration,
) -> Result<TextDocument, OcrError> {
    if bytes.is_empty() {
        return Err(OcrError::MissingImage);
    }

    let mut staged = NamedTempFile::new()?;
    staged.write_all(bytes)?;
    staged.flush()?;
    debug!(path = %staged.path().display(), size = bytes.len(), "staged upload");

    let raw = match tokio::time::timeout(timeout, engine.recognize(staged.path(), lang)).await {
        Ok(result) => result?,
        Err(_) => return Err(OcrError::Timeout(timeout)),
    };

    let text = normalize::normalize(&raw);
    Ok(TextDocument::from_text(&text))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use super::*;

    /// Engine double that records the path it was handed and returns a
    /// canned outcome.
    struct ScriptedEngine {
        outcome: Result<String, String>,
        seen_path: Mutex<Option<PathBuf>>,
    }

    impl ScriptedEngine {
        fn ok(text: &str) -> Self {
            Self {
                outcome: Ok(text.to_string()),
                seen_path: Mutex::new(None),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                seen_path: Mutex::new(None),
            }
        }

        fn seen_path(&self) -> PathBuf {
            self.seen_path.lock().unwrap().clone().expect("engine was invoked")
        }
    }

    #[async_trait]
    impl OcrEngine for ScriptedEngine {
        async fn recognize(&self, path: &Path, _lang: &str) -> Result<String, OcrError> {
            *self.seen_path.lock().unwrap() = Some(path.to_path_buf());
            assert!(path.exists(), "staged file must exist while the engine runs");
            self.outcome.clone().map_err(OcrError::Engine)
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn recognized_text_becomes_a_document() {
        let engine = ScriptedEngine::ok("linha um-\nlinha  dois\n");
        let doc = process_image(&engine, b"fake image bytes", "por", TIMEOUT)
            .await
            .expect("pipeline");
        assert_eq!(doc.ops.len(), 1);
        assert_eq!(doc.ops[0].insert, "linha umlinha dois\n");
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let engine = ScriptedEngine::ok("anything");
        let err = process_image(&engine, b"", "por", TIMEOUT).await.unwrap_err();
        assert!(matches!(err, OcrError::MissingImage));
    }

    #[tokio::test]
    async fn staged_file_is_removed_on_success() {
        let engine = ScriptedEngine::ok("texto");
        process_image(&engine, b"bytes", "por", TIMEOUT)
            .await
            .expect("pipeline");
        assert!(!engine.seen_path().exists());
    }

    #[tokio::test]
    async fn staged_file_is_removed_on_engine_failure() {
        let engine = ScriptedEngine::failing("engine exploded");
        let err = process_image(&engine, b"bytes", "por", TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Engine(ref m) if m == "engine exploded"));
        assert!(!engine.seen_path().exists());
    }

    #[tokio::test]
    async fn slow_engine_is_cut_off_and_file_removed() {
        struct StallingEngine {
            seen_path: Mutex<Option<PathBuf>>,
        }

        #[async_trait]
        impl OcrEngine for StallingEngine {
            async fn recognize(&self, path: &Path, _lang: &str) -> Result<String, OcrError> {
                *self.seen_path.lock().unwrap() = Some(path.to_path_buf());
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(String::new())
            }
        }

        let engine = StallingEngine {
            seen_path: Mutex::new(None),
        };
        let err = process_image(&engine, b"bytes", "por", Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Timeout(_)));
        let path = engine.seen_path.lock().unwrap().clone().expect("invoked");
        assert!(!path.exists());
    }
}

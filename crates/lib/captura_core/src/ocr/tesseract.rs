//! Tesseract CLI engine.
//!
//! Invokes the `tesseract` binary against the staged image and reads the
//! recognized text from stdout. The binary name is configurable so
//! deployments can point at a wrapper script or an absolute path.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{OcrEngine, OcrError};

/// OCR engine backed by the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: String,
}

impl TesseractEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(&self, path: &Path, lang: &str) -> Result<String, OcrError> {
        debug!(command = %self.command, lang, image = %path.display(), "invoking OCR engine");

        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .output()
            .await
            .map_err(|e| OcrError::Engine(format!("failed to spawn {}: {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_an_engine_error() {
        let engine = TesseractEngine::new("captura-no-such-binary");
        let err = engine
            .recognize(Path::new("/tmp/does-not-matter.png"), "por")
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Engine(ref m) if m.contains("captura-no-such-binary")));
    }
}

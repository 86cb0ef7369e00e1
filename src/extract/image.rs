use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::ExtractError;

/// External OCR program invoked as `<command> <image> stdout [-l <language>]`
#[derive(Debug, Clone)]
pub struct OcrEngine {
    command: String,
    language: Option<String>,
}

impl OcrEngine {
    pub fn new(command: String, language: Option<String>) -> Self {
        Self { command, language }
    }

    /// Runs the OCR program on `path` and returns its standard output.
    pub fn recognize(&self, path: &Path) -> Result<String, ExtractError> {
        let binary = which::which(&self.command)
            .map_err(|e| ExtractError::Ocr(format!("{} not available: {}", self.command, e)))?;

        let mut command = Command::new(binary);
        command.arg(path).arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }

        let output = command.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Validates the image header, then recognises its text.
pub fn recognize_text(path: &Path, ocr: &OcrEngine) -> Result<String, ExtractError> {
    let (width, height) = ::image::image_dimensions(path)?;
    debug!(path = %path.display(), width, height, "Running OCR");
    ocr.recognize(path)
}

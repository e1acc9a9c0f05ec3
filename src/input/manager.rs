//! Input manager routing files to the matching extractor

use crate::error::{AtsTailorError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct InputManager {
    cache: HashMap<PathBuf, String>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached) = self.cache.get(path) {
            debug!("Using cached text for: {}", path.display());
            return Ok(cached.clone());
        }

        if !path.is_file() {
            return Err(AtsTailorError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match Self::detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Docx => {
                info!("Extracting text from DOCX: {}", path.display());
                DocxExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unsupported => {
                return Err(AtsTailorError::UnsupportedFormat(format!(
                    "{} (expected .pdf, .docx, .md or .txt)",
                    path.display()
                )));
            }
        };

        if text.trim().is_empty() {
            warn!("No text could be extracted from {}", path.display());
        }

        self.cache.insert(path.to_path_buf(), text.clone());
        Ok(text)
    }

    fn detect_file_type(path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                AtsTailorError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_markdown_and_text_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let md = temp_dir.path().join("resume.md");
        let txt = temp_dir.path().join("job.txt");
        std::fs::write(&md, "## Experience\n\n* Built pipelines\n").unwrap();
        std::fs::write(&txt, "Requirements:\n- Python").unwrap();

        let mut manager = InputManager::new();
        assert_eq!(
            manager.extract_text(&md).await.unwrap(),
            "Experience\n- Built pipelines"
        );
        assert_eq!(
            manager.extract_text(&txt).await.unwrap(),
            "Requirements:\n- Python"
        );
        assert_eq!(manager.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_rejects_missing_and_unsupported_files() {
        let temp_dir = TempDir::new().unwrap();
        let odt = temp_dir.path().join("resume.odt");
        let broken_docx = temp_dir.path().join("resume.docx");
        std::fs::write(&odt, "binary").unwrap();
        std::fs::write(&broken_docx, "binary").unwrap();

        let mut manager = InputManager::new();
        assert!(matches!(
            manager.extract_text(&odt).await,
            Err(AtsTailorError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            manager.extract_text(&broken_docx).await,
            Err(AtsTailorError::DocxExtraction(_))
        ));
        assert!(matches!(
            manager.extract_text(&temp_dir.path().join("nope.txt")).await,
            Err(AtsTailorError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_file_passes_through() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.txt");
        std::fs::write(&empty, "  \n").unwrap();

        let mut manager = InputManager::new();
        let text = manager.extract_text(&empty).await.unwrap();
        assert!(text.trim().is_empty());
    }
}

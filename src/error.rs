//! Error handling for the ATS tailor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsTailorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid scoring configuration. Fatal: no scoring runs until it is fixed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The similarity primitive could not produce a score.
    #[error("Matching unavailable: {0}")]
    MatchingUnavailable(String),

    #[error("Taxonomy error: {0}")]
    Taxonomy(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AtsTailorError>;

/// Model loaders report through anyhow
impl From<anyhow::Error> for AtsTailorError {
    fn from(err: anyhow::Error) -> Self {
        AtsTailorError::ModelError(err.to_string())
    }
}

impl From<toml::de::Error> for AtsTailorError {
    fn from(err: toml::de::Error) -> Self {
        AtsTailorError::Config(format!("Failed to parse config: {}", err))
    }
}

impl AtsTailorError {
    /// True for errors raised before any scoring work starts
    pub fn is_config(&self) -> bool {
        matches!(self, AtsTailorError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = AtsTailorError::Config("weights sum to 0.9".to_string());
        assert_eq!(err.to_string(), "Configuration error: weights sum to 0.9");
        assert!(err.is_config());
    }

    #[test]
    fn test_anyhow_maps_to_model_error() {
        let err: AtsTailorError = anyhow::anyhow!("tokenizer.json missing").into();
        assert!(matches!(err, AtsTailorError::ModelError(_)));
        assert!(!err.is_config());
    }
}

//! Resume and job description loading from PDF, Markdown and plain text

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::InputManager;

//! Text processing, evidence extraction and matching

pub mod embedding_manager;
pub mod embeddings;
pub mod job;
pub mod matcher;
pub mod resume;
pub mod sections;
pub mod similarity;
pub mod text_processor;

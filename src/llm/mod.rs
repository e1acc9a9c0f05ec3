//! Prompt generation for bullet rewrites. No model is called from this crate.

pub mod prompts;

pub use prompts::{PromptTemplates, RewritePrompt};

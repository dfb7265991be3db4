//! Answer generation: relevance gating and prompt assembly

pub mod prompt;
pub mod relevance;

pub use prompt::PromptBuilder;
pub use relevance::RelevanceGate;

//! Query request types

use serde::{Deserialize, Serialize};

use super::document::DocCategory;

/// Query request for the RAG pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Number of passages to retrieve (default: 5)
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Fusion weight for the semantic score; lexical gets the remainder.
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub semantic_weight: Option<f32>,

    /// Restrict retrieval to these categories (absent or empty = all)
    #[serde(default)]
    pub categories: Option<Vec<DocCategory>>,
}

fn default_top_n() -> usize {
    5
}

impl QueryRequest {
    /// Create a new query with defaults
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_n: default_top_n(),
            semantic_weight: None,
            categories: None,
        }
    }

    /// Set the number of results to retrieve
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Set the fusion weight
    pub fn with_semantic_weight(mut self, weight: f32) -> Self {
        self.semantic_weight = Some(weight);
        self
    }

    /// Restrict to specific categories
    pub fn with_categories(mut self, categories: Vec<DocCategory>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Category filter, normalized: an empty selection means no filter
    pub fn category_filter(&self) -> Option<&[DocCategory]> {
        match self.categories.as_deref() {
            Some([]) | None => None,
            Some(filter) => Some(filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_category_list_means_unfiltered() {
        let request = QueryRequest::new("test").with_categories(vec![]);
        assert!(request.category_filter().is_none());
    }

    #[test]
    fn category_filter_passes_through() {
        let request =
            QueryRequest::new("test").with_categories(vec![DocCategory::Insurance]);
        assert_eq!(request.category_filter(), Some(&[DocCategory::Insurance][..]));
    }
}

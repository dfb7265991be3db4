//! Domain relevance gate applied before retrieval

/// Keyword list covering the three document domains. A question must mention
/// at least one of these (case-insensitive substring) to reach retrieval.
const DOMAIN_KEYWORDS: &[&str] = &[
    "health",
    "medical",
    "patient",
    "doctor",
    "hospital",
    "insurance",
    "coverage",
    "claim",
    "policy",
    "premium",
    "deductible",
    "pharmaceutical",
    "pharmacy",
    "drug",
    "medicine",
    "medication",
    "clinical",
    "trial",
    "treatment",
    "diagnosis",
    "therapy",
    "care",
    "prescription",
    "dosage",
    "vaccine",
];

/// Cheap lexical check for whether a question is in scope for the corpus
pub struct RelevanceGate;

impl RelevanceGate {
    /// Returns true if the question plausibly concerns the document domains
    pub fn is_relevant(question: &str) -> bool {
        let lower = question.to_lowercase();
        DOMAIN_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_questions_pass() {
        assert!(RelevanceGate::is_relevant("What does my insurance cover?"));
        assert!(RelevanceGate::is_relevant("Side effects of this DRUG?"));
        assert!(RelevanceGate::is_relevant(
            "How long did the clinical trial run?"
        ));
    }

    #[test]
    fn off_domain_questions_fail() {
        assert!(!RelevanceGate::is_relevant("What is the capital of France?"));
        assert!(!RelevanceGate::is_relevant("Write me a poem about autumn"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(RelevanceGate::is_relevant("INSURANCE PREMIUM QUESTION"));
    }
}

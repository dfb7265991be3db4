//! Prompt assembly for grounded answer generation

use crate::types::ScoredChunk;

/// Builds context blocks and the final generation prompt
pub struct PromptBuilder;

impl PromptBuilder {
    /// Assemble retrieved chunks into numbered, source-labelled context
    /// blocks
    pub fn build_context(chunks: &[ScoredChunk]) -> String {
        let mut context = String::new();
        for (i, scored) in chunks.iter().enumerate() {
            let source = &scored.chunk.source;
            let label = match source.page_number {
                Some(page) => format!("{} (page {})", source.filename, page),
                None => source.filename.clone(),
            };
            context.push_str(&format!("[Document {}: {}]\n", i + 1, label));
            context.push_str(scored.chunk.content.trim());
            context.push_str("\n\n");
        }
        context
    }

    /// Build the full prompt: instructions, context, then the question.
    ///
    /// The model is told to answer only from the provided documents and to
    /// say so when they do not contain the answer.
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            "You are a helpful assistant answering questions about healthcare, \
             insurance, and pharmaceutical documents.\n\
             Answer the question using ONLY the information in the documents \
             below. Cite the document numbers you used, like [Document 1]. If \
             the documents do not contain the answer, say that you could not \
             find the information in the available documents.\n\n\
             Documents:\n{}\n\
             Question: {}\n\n\
             Answer:",
            context.trim_end(),
            question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, DocCategory, DocumentSource, FileType};
    use uuid::Uuid;

    fn scored(filename: &str, page: Option<u32>, content: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(
                Uuid::new_v4(),
                content.to_string(),
                DocumentSource {
                    filename: filename.to_string(),
                    file_path: format!("/docs/{}", filename),
                    file_type: if filename.ends_with(".pdf") {
                        FileType::Pdf
                    } else {
                        FileType::Txt
                    },
                    page_number: page,
                    category: DocCategory::Insurance,
                },
                0,
                0,
                content.len(),
            ),
            score: 0.9,
            semantic_score: 0.9,
            lexical_score: 0.9,
        }
    }

    #[test]
    fn context_numbers_documents_and_labels_pages() {
        let chunks = vec![
            scored("policy.pdf", Some(3), "premium terms"),
            scored("notes.txt", None, "claim process"),
        ];
        let context = PromptBuilder::build_context(&chunks);

        assert!(context.contains("[Document 1: policy.pdf (page 3)]"));
        assert!(context.contains("[Document 2: notes.txt]"));
        assert!(context.contains("premium terms"));
    }

    #[test]
    fn prompt_contains_context_and_question() {
        let context = PromptBuilder::build_context(&[scored("a.txt", None, "some facts")]);
        let prompt = PromptBuilder::build_rag_prompt("What are the facts?", &context);

        assert!(prompt.contains("some facts"));
        assert!(prompt.contains("Question: What are the facts?"));
        assert!(prompt.ends_with("Answer:"));
    }
}

use crate::registry::PromptRegistry;
use castor_schema::PromptConfig;
use tracing::info;

/// The shipped prompt set. Authoritative for which prompt names exist and
/// for every prompt's `default_text`.
pub fn default_prompts() -> Vec<PromptConfig> {
    vec![
        PromptConfig::shipped(
            "optimizer_basic-default",
            "Basic Example",
            "Basic default system prompt for chat without retrieval.",
            &["sys", "chat"],
            "You are a friendly, helpful assistant. \
             Answer the question concisely; if you do not know the answer, say so.",
        ),
        PromptConfig::shipped(
            "optimizer_tools-default",
            "Tools Example",
            "System prompt for chat with tool calling enabled.",
            &["sys", "tools"],
            "You are a helpful assistant with access to tools. \
             Use a tool only when it is needed to answer, and cite what the tool returned.",
        ),
        PromptConfig::shipped(
            "optimizer_context-default",
            "Contextualize",
            "Rewrites a follow-up question into a standalone question using chat history.",
            &["ctx"],
            "Given the chat history and the latest user question, which might reference \
             context in the chat history, formulate a standalone question that can be \
             understood without the chat history. Do NOT answer the question.",
        ),
        PromptConfig::shipped(
            "optimizer_vs-grade",
            "Document Grading",
            "Grades whether a retrieved document is relevant to the question.",
            &["vector_search", "grading"],
            "You are a grader assessing relevance of a retrieved document to a user question. \
             Answer with a single word, 'yes' or 'no'.",
        ),
        PromptConfig::shipped(
            "optimizer_vs-rephrase",
            "Question Rephrase",
            "Rephrases the user question to improve vector search recall.",
            &["vector_search", "rephrase"],
            "Rephrase the following question so it is optimized for semantic search. \
             Return only the rephrased question.",
        ),
    ]
}

/// Seeds the prompt registry unless it already holds entries. The boot-time
/// reconciliation pass keeps a non-empty registry in line with the shipped set.
pub fn load_default_prompts(registry: &PromptRegistry) -> usize {
    let added = registry.seed_if_empty(default_prompts());
    info!(added, total = registry.len(), "Default prompts loaded");
    added
}

use crate::registry::ModelRegistry;
use castor_schema::{ModelConfig, ModelType};
use tracing::info;

fn ll(id: &str, provider: &str, max_input_tokens: u32, max_tokens: u32) -> ModelConfig {
    let mut m = ModelConfig::new(id, ModelType::Ll, provider);
    m.max_input_tokens = Some(max_input_tokens);
    m.max_tokens = Some(max_tokens);
    m.temperature = Some(1.0);
    m.top_p = Some(1.0);
    m.frequency_penalty = Some(0.0);
    m.presence_penalty = Some(0.0);
    m
}

fn embed(id: &str, provider: &str, max_chunk_size: u32) -> ModelConfig {
    let mut m = ModelConfig::new(id, ModelType::Embed, provider);
    m.max_chunk_size = Some(max_chunk_size);
    m
}

/// Models shipped with the service. All start disabled; credentials and
/// on-prem endpoints arrive through env overrides.
pub fn default_models() -> Vec<ModelConfig> {
    let mut ollama_chat = ll("llama3.1", "ollama", 131_072, 2048);
    ollama_chat.api_base = Some("http://127.0.0.1:11434".to_string());
    let mut ollama_embed = embed("mxbai-embed-large", "ollama", 512);
    ollama_embed.api_base = Some("http://127.0.0.1:11434".to_string());
    let mut hf_embed = embed("thenlper/gte-base", "huggingface", 512);
    hf_embed.api_base = Some("http://127.0.0.1:8080".to_string());
    let mut openai_chat = ll("gpt-4o-mini", "openai", 128_000, 4096);
    openai_chat.api_base = Some("https://api.openai.com/v1".to_string());
    let mut openai_embed = embed("text-embedding-3-small", "openai", 8191);
    openai_embed.api_base = Some("https://api.openai.com/v1".to_string());

    vec![
        openai_chat,
        ll("gpt-4o", "openai", 128_000, 4096),
        ll("command-r", "cohere", 127_072, 4096),
        ll("sonar", "perplexity", 127_072, 4096),
        ollama_chat,
        openai_embed,
        embed("embed-english-v3.0", "cohere", 512),
        ollama_embed,
        hf_embed,
        ModelConfig::new("rerank-english-v3.0", ModelType::Rerank, "cohere"),
    ]
}

/// Seeds the model registry unless it already holds entries.
pub fn load_default_models(registry: &ModelRegistry) -> usize {
    let added = registry.seed_if_empty(default_models());
    info!(added, total = registry.len(), "Default models loaded");
    added
}

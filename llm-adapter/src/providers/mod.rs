pub mod ollama;
pub mod openai;

pub use ollama::OllamaService;
pub use openai::OpenAiService;

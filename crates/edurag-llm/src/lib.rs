//! EduRAG LLM - Chat model port and adapters
//!
//! This crate defines the port for chat completion, the OpenAI-compatible
//! adapter used against DashScope, reply parsing, and the Hebrew prompt
//! builders for profile building and grading.

pub mod openai;
pub mod ports;
pub mod prompts;
pub mod reply;

// Re-export main types
pub use openai::OpenAiChatModel;
pub use ports::{ChatModel, ChatRequest};
pub use reply::extract_json_object;

//! Generation Client
//!
//! 외부 생성 서비스(Gemini)를 통한 아이디어 생성과 리믹스

pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod provider;
pub mod schema;

pub use gemini::GeminiClient;
pub use generator::{IdeaGenerator, RemixSource};
pub use provider::{GenerationRequest, IdeationProvider, ProviderError};

//! Gemini-backed implementations of the ARCANA generator traits.

pub mod gemini;
pub mod gemini_image_agent;
pub mod gemini_text_agent;

pub use gemini::GeminiClient;
pub use gemini_image_agent::GeminiImageAgent;
pub use gemini_text_agent::GeminiTextAgent;

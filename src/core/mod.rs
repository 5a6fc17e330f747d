pub mod app;
pub mod chat_stream;
pub mod config;
pub mod error;
pub mod gemini;
pub mod instructions;
pub mod locale;
pub mod session;
pub mod sse;
pub mod transcript;

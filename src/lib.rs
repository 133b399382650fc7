// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod dictionary;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod word_source;

pub use session::{InputOutcome, SessionConfig, SessionState, TypingSession};

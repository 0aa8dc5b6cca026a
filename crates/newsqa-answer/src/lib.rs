//! newsqa-answer
//!
//! Answer synthesis over fused retrieval evidence: the generation-backend
//! client, grounding-prompt construction, the degradation ladder, bounded
//! per-session conversation history, and the `QaEngine` that wires the whole
//! ask-question flow together.

pub mod client;
pub mod conversation;
pub mod engine;
pub mod prompt;
pub mod synthesizer;

pub use client::GenerationClient;
pub use conversation::ConversationStore;
pub use engine::QaEngine;
pub use synthesizer::{AnswerSynthesizer, SynthesizedAnswer};

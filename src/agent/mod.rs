//! Agent module - reasoning client, conversation state, and the turn loop
//!
//! This module owns the reasoning-service boundary:
//! - OpenAI-compatible chat-completions client with function calling
//! - Conversation history management
//! - The bounded reasoning/tool round-trip loop
//! - The account-intelligence system prompt

mod agentic_loop;
mod client;
mod conversation;
pub mod prompts;
mod types;

pub use agentic_loop::{
    run_turn, LoopConfig, NoOpObserver, TurnObserver, MAX_ITERATIONS_MESSAGE,
};
pub use client::{OpenAiClient, ReasoningClient};
pub use conversation::Conversation;
pub use types::*;

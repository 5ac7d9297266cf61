//! # Acumen
//!
//! An account-intelligence retrieval agent built with Rust.
//!
//! Acumen routes natural-language account questions to a small set of
//! domain-scoped enterprise search tools (Salesforce, Looker, Google Drive,
//! Gong/Slack/Gmail) backed by a Glean semantic-search index, then drives an
//! OpenAI-compatible reasoning service to synthesize a citation-backed
//! answer.
//!
//! ## Features
//!
//! - **Source-of-truth routing:** each tool pins the datasources and facet
//!   filters appropriate to its question domain
//! - **Query normalization:** account names are auto-quoted for exact-phrase
//!   matching against a backend with no entity-name filter
//! - **Bounded tool-calling loop:** a fixed iteration budget caps
//!   reasoning/tool round-trips per user turn
//! - **Human-in-the-loop fallback:** unrestricted cross-source search only
//!   runs after the user approves widening scope

pub mod agent;
pub mod config;
pub mod error;
pub mod search;
pub mod tools;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Tools module - the account-intelligence tool catalog
//!
//! Tools implement the `Tool` trait and are registered into a `ToolRegistry`
//! which presents their schemas to the reasoning service for function
//! calling. The catalog is a fixed table of search scopes (see `catalog`);
//! it is built once at startup and read-only afterwards.

mod catalog;
mod registry;
mod traits;

// Core trait and types
pub use traits::{Tool, ToolCall, ToolResult};

// Registry
pub use registry::ToolRegistry;

// Account-intelligence catalog
pub use catalog::{account_tools, ReadDocumentTool, ScopedSearchTool, SearchScope};

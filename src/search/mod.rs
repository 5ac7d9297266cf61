//! Search module - Glean gateway, query normalization, and result formatting
//!
//! Everything between a tool's fixed search scope and the text block handed
//! back to the reasoning service:
//!
//! - **query**: rewrites raw queries into a search-engine-friendly form by
//!   quoting the presumed account name
//! - **gateway**: issues the HTTP search request and normalizes the
//!   heterogeneous result payload into flat `ResultRecord`s
//! - **format**: renders records into a single citation-ready text block

mod format;
mod gateway;
mod query;

pub use format::format_results;
pub use gateway::{
    FacetFilter, FacetValue, GleanClient, ResultRecord, SearchBackend, SearchRequest,
};
pub use query::quote_entity;

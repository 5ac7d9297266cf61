//! Result formatting
//!
//! Renders search results into a single markdown-ish text block consumed as
//! LLM context and readable by operators. The header lists every datasource
//! seen across ALL records (not just the rendered ones) so a caller can spot
//! cross-source leakage — e.g. a Salesforce-only query that returned Looker
//! rows.

use std::collections::BTreeSet;

use crate::search::ResultRecord;

/// Fixed cap on rendered entries
const MAX_RENDERED: usize = 5;

/// Content preview length in characters
const PREVIEW_CHARS: usize = 500;

/// Format records into a citation-ready block.
///
/// Empty input yields the sentinel `"No results found in {source_label}."`.
/// A leading error record returns its message verbatim.
pub fn format_results(records: &[ResultRecord], source_label: &str) -> String {
    if records.is_empty() {
        return format!("No results found in {}.", source_label);
    }

    if let Some(error) = &records[0].error {
        return error.clone();
    }

    // Distinct sources over the full record list, sorted for stable output
    let sources: BTreeSet<&str> = records.iter().map(|r| r.source.as_str()).collect();
    let source_list: Vec<&str> = sources.into_iter().collect();

    let mut entries = Vec::new();
    for (i, record) in records.iter().take(MAX_RENDERED).enumerate() {
        entries.push(render_entry(record, i + 1));
    }

    let header = format!(
        "Found {} result(s) from {}\n[Datasources in results: {}]\n\n",
        records.len(),
        source_label,
        source_list.join(", ")
    );

    header + &entries.join("\n\n---\n\n")
}

fn render_entry(record: &ResultRecord, index: usize) -> String {
    let mut entry = format!("**[{}] {}**", index, record.title);

    // Datasource is emphasized so filter correctness is auditable
    entry.push_str(&format!("\n- **Datasource: {}**", record.source));

    if let Some(updated) = &record.updated {
        if !updated.is_empty() {
            entry.push_str(&format!(" | Updated: {}", calendar_date(updated)));
        }
    }
    if let Some(author) = &record.author {
        if !author.is_empty() {
            entry.push_str(&format!(" | Author: {}", author));
        }
    }

    if !record.content.is_empty() {
        entry.push_str(&format!("\n- Content: {}", preview(&record.content)));
    }

    entry.push_str(&format!("\n- URL: {}", record.url));
    entry
}

/// Truncate an ISO timestamp to calendar-date granularity
fn calendar_date(timestamp: &str) -> &str {
    let end = timestamp
        .char_indices()
        .nth(10)
        .map(|(i, _)| i)
        .unwrap_or(timestamp.len());
    &timestamp[..end]
}

fn preview(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let clipped: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", clipped)
    } else {
        content.to_string()
    }
}

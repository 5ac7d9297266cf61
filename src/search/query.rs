//! Query normalization
//!
//! Glean has no dedicated entity-name filter; account scoping happens through
//! the query string. Quoting the leading account name forces exact-phrase
//! matching, which keeps a query for "Acme Corp" from surfacing
//! "Acme Corp Holdings" rows. Assumes the account name sits at the start of
//! the query, which the system prompt instructs the model to do.

/// Tokens that mark the end of the account-name prefix. Everything from the
/// first match onward is treated as the action part of the query.
const ACTION_WORDS: &[&str] = &[
    "renewal", "renew", "contract", "opportunity", "deal",
    "contact", "contacts", "stakeholder", "decision",
    "account", "company", "info", "overview",
    "call", "calls", "meeting", "email", "slack",
    "qbr", "ebr", "plan", "strategy", "doc",
    "metric", "metrics", "dashboard", "spend", "funding",
    "key", "recent", "last", "latest", "upcoming",
];

/// Quote the leading account name in a query.
///
/// Idempotent: queries that already start with a quote are returned
/// unchanged, and so are queries containing no action keyword at all (there
/// is nothing to delimit the account name against, so quoting would be a
/// guess).
pub fn quote_entity(raw_query: &str) -> String {
    if raw_query.starts_with('"') {
        return raw_query.to_string();
    }

    let mut entity_words: Vec<&str> = Vec::new();
    let mut rest_words: Vec<&str> = Vec::new();
    let mut found_action = false;

    for word in raw_query.split_whitespace() {
        if !found_action && !is_action_word(word) {
            entity_words.push(word);
        } else {
            found_action = true;
            rest_words.push(word);
        }
    }

    if found_action && !entity_words.is_empty() {
        format!("\"{}\" {}", entity_words.join(" "), rest_words.join(" "))
            .trim_end()
            .to_string()
    } else {
        raw_query.to_string()
    }
}

fn is_action_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    ACTION_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_account_before_action_word() {
        assert_eq!(quote_entity("Acme renewal date"), "\"Acme\" renewal date");
        assert_eq!(
            quote_entity("JPMorgan Chase renewal"),
            "\"JPMorgan Chase\" renewal"
        );
        assert_eq!(
            quote_entity("AdventHealth key contacts"),
            "\"AdventHealth\" key contacts"
        );
    }

    #[test]
    fn test_no_action_word_is_unchanged() {
        assert_eq!(quote_entity("Acme Corp"), "Acme Corp");
        assert_eq!(quote_entity("JPMorgan Chase"), "JPMorgan Chase");
    }

    #[test]
    fn test_already_quoted_is_unchanged() {
        assert_eq!(
            quote_entity("\"Already Quoted\" renewal"),
            "\"Already Quoted\" renewal"
        );
    }

    #[test]
    fn test_action_word_matching_is_case_insensitive() {
        assert_eq!(quote_entity("Target Renewal date"), "\"Target\" Renewal date");
    }

    #[test]
    fn test_leading_action_word_collects_no_entity() {
        // Nothing before the first action word: leave the query alone.
        assert_eq!(quote_entity("recent calls"), "recent calls");
    }

    #[test]
    fn test_idempotence() {
        for q in [
            "Acme renewal date",
            "Acme Corp",
            "\"Kaiser Permanente\" recent calls",
            "recent calls",
            "",
        ] {
            let once = quote_entity(q);
            assert_eq!(quote_entity(&once), once, "not idempotent for {q:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(quote_entity(""), "");
    }
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and redaction of shopper input.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "storefront_search=info";

/// Install the global `tracing` subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Redact a search query for logging.
/// Shows the first character and the length, hides the rest: "b*** (5 chars)"
pub fn redact_query(query: &str) -> String {
    let len = query.chars().count();
    match query.chars().next() {
        None => "<empty>".to_string(),
        Some(first) => format!("{}*** ({} chars)", first, len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_query() {
        assert_eq!(redact_query("boots"), "b*** (5 chars)");
        assert_eq!(redact_query("x"), "x*** (1 chars)");
    }

    #[test]
    fn test_redact_query_counts_chars_not_bytes() {
        assert_eq!(redact_query("ényé"), "é*** (4 chars)");
    }

    #[test]
    fn test_redact_query_empty() {
        assert_eq!(redact_query(""), "<empty>");
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}

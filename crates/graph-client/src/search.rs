use std::collections::HashSet;

use crate::types::SearchResult;

/// Characters with meaning in Lucene query syntax.
const LUCENE_SPECIAL: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// Escape `query` so the fulltext index treats it as plain terms.
///
/// Special characters get a backslash prefix. A standalone `AND`, `OR` or
/// `NOT` has each letter escaped so it is matched as a word, not an
/// operator.
pub fn lucene_sanitize(query: &str) -> String {
    let mut out = String::with_capacity(query.len() * 2);
    for (i, word) in query.split(' ').enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if matches!(word, "AND" | "OR" | "NOT") {
            for c in word.chars() {
                out.push('\\');
                out.push(c);
            }
            continue;
        }
        for c in word.chars() {
            if LUCENE_SPECIAL.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out
}

/// Order hits best-first, drop repeated uuids, and keep at most `limit`.
///
/// Equal scores fall back to uuid order so output is deterministic.
pub fn rank(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    results.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.uuid.cmp(&b.uuid))
    });
    let mut seen = HashSet::new();
    results.retain(|r| seen.insert(r.uuid.clone()));
    results.truncate(limit);
    results
}

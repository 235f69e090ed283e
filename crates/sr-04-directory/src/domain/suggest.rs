//! # Suggestions
//!
//! Case-insensitive substring filter over a directory list.

/// Maximum suggestions shown for one query.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Entries containing `query`, ignoring case, in directory order.
///
/// A blank query yields nothing.
pub fn suggest(entries: &[String], query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .iter()
        .filter(|entry| entry.to_lowercase().contains(&needle))
        .take(limit)
        .cloned()
        .collect()
}

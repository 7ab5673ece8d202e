//! Pagination defaults and clamping for catalog listings.

/// Default page size for product listings.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Hard upper bound on a single page.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Default number of related products on a detail page.
pub const DEFAULT_RELATED_LIMIT: i64 = 3;

/// Upper bound for related products.
pub const MAX_RELATED_LIMIT: i64 = 12;

/// Clamp a requested limit into `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Escape `%`, `_` and `\` so user input is matched literally inside `ILIKE`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

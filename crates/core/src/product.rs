//! Product catalog rules: categories, slug generation and field validation.
//!
//! Handlers call these before anything reaches the repository, so the
//! database constraints only ever fire on races (e.g. two concurrent
//! creates with the same slug).

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category constants
// ---------------------------------------------------------------------------

pub const CATEGORY_INSECTICIDES: &str = "Insecticides";
pub const CATEGORY_FUNGICIDES: &str = "Fungicides";
pub const CATEGORY_HERBICIDES: &str = "Herbicides";
pub const CATEGORY_PGR: &str = "PGR";
pub const CATEGORY_FERTILIZERS: &str = "Fertilizers";
pub const CATEGORY_BIOLOGICAL: &str = "Biological";

/// All valid product categories. Must match the CHECK constraint in the
/// `create_products_table` migration.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_INSECTICIDES,
    CATEGORY_FUNGICIDES,
    CATEGORY_HERBICIDES,
    CATEGORY_PGR,
    CATEGORY_FERTILIZERS,
    CATEGORY_BIOLOGICAL,
];

/// Category filter value that means "every category".
pub const ALL_CATEGORIES_FILTER: &str = "All";

/// Safety note stored when the admin form leaves it blank.
pub const DEFAULT_SAFETY_NOTE: &str = "Always read the product label carefully before use. \
Follow all safety precautions and local regulations.";

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_SLUG_LEN: usize = 200;
pub const MAX_LIST_ENTRIES: usize = 50;
pub const MAX_LIST_ENTRY_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Generate a URL-safe slug from a product name.
///
/// Lower-cases the name, replaces every run of characters outside
/// `[a-z0-9]` with a single hyphen and trims hyphens from both ends.
/// Non-ASCII letters count as separators.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Trim and lower-case an admin-supplied slug.
pub fn normalize_slug(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Resolve the slug to store: a non-blank supplied slug is normalized,
/// otherwise one is derived from the name.
pub fn resolve_slug(supplied: Option<&str>, name: &str) -> String {
    match supplied.map(normalize_slug) {
        Some(s) if !s.is_empty() => s,
        _ => generate_slug(name),
    }
}

/// Validate a slug (non-empty, only lowercase alphanumeric + hyphens).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation(
            "Slug is required (the name produced an empty slug)".into(),
        ));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate a product name (non-blank, bounded length).
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Product name is required".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Product name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a product category against the fixed set.
pub fn validate_category(cat: &str) -> Result<(), CoreError> {
    if !VALID_CATEGORIES.contains(&cat) {
        return Err(CoreError::Validation(format!(
            "Invalid category '{}'. Valid categories: {}",
            cat,
            VALID_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

/// Parse the list filter value. `All` (or absent) means no filter.
pub fn parse_category_filter(raw: Option<&str>) -> Result<Option<&str>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(ALL_CATEGORIES_FILTER) => Ok(None),
        Some(cat) => {
            validate_category(cat)?;
            Ok(Some(cat))
        }
    }
}

/// Validate a required free-text field. `label` is the human-readable name
/// used in the error message, e.g. `"Dosage information"`.
pub fn validate_required(label: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{label} is required")));
    }
    Ok(())
}

/// Validate the product image reference. Uploads come back from the image
/// host as absolute URLs, so anything else is a client bug.
pub fn validate_image_url(url: &str) -> Result<(), CoreError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(CoreError::Validation("Product image is required".into()));
    }
    if !(url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/')) {
        return Err(CoreError::Validation(
            "Product image must be an http(s) URL or a site-relative path".into(),
        ));
    }
    Ok(())
}

/// Validate a list field (pests, crops, pack sizes, ...).
pub fn validate_string_list(label: &str, items: &[String]) -> Result<(), CoreError> {
    if items.len() > MAX_LIST_ENTRIES {
        return Err(CoreError::Validation(format!(
            "{label}: a maximum of {MAX_LIST_ENTRIES} entries is allowed"
        )));
    }
    for item in items {
        if item.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "{label}: entries must not be empty"
            )));
        }
        if item.len() > MAX_LIST_ENTRY_LEN {
            return Err(CoreError::Validation(format!(
                "{label}: each entry must be at most {MAX_LIST_ENTRY_LEN} characters"
            )));
        }
    }
    Ok(())
}

/// Trim every entry and drop blanks. Admin forms submit one entry per
/// textarea line, so trailing empty lines are common.
pub fn clean_string_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

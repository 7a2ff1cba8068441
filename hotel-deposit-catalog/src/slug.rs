//! URL-safe hotel identifiers derived from free text.
//!
//! Slugs are deterministic but not injective: distinct inputs that differ
//! only in punctuation or spacing map to the same slug, and a re-import of
//! such a record merges into the existing hotel.

/// Convert free text into a lowercase, hyphen-separated token.
///
/// Lowercases, drops everything outside `[a-z0-9]`, whitespace and `-`,
/// turns whitespace runs into a single hyphen, collapses hyphen runs, then
/// trims hyphens from both ends. Never fails; may return an empty string.
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !result.is_empty() {
                result.push('-');
            }
            pending_separator = false;
            result.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_separator = true;
        }
    }

    result
}

/// Derive a hotel slug from its name and city.
///
/// A blank or missing city contributes nothing, so `("Inn", None)` and
/// `("Inn", Some(""))` agree.
pub fn hotel_slug(name: &str, city: Option<&str>) -> String {
    match city.map(str::trim).filter(|c| !c.is_empty()) {
        Some(city) => slugify(&format!("{name}-{city}")),
        None => slugify(name),
    }
}

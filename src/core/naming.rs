//! Identifier transformations for code generation
//!
//! Pure helpers that move names between the conventions used in the
//! specification (mixed-case field and model names) and the ones needed by the
//! generated Go sources (exported identifiers, snake_case wire tags, lowercase
//! file and package segments).

use once_cell::sync::Lazy;
use regex::Regex;

/// A character followed by a title-cased word (`fooBar` -> `foo` + `Bar`).
static FIRST_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^_])([A-Z][a-z]+)").expect("valid first-cap pattern"));

/// A lowercase letter or digit immediately followed by an uppercase letter.
static ALL_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid all-cap pattern"));

/// Lowercases a model or feature name for use as a file or package segment.
///
/// # Examples
/// ```
/// use aquamarine::core::naming::to_file_slug;
///
/// assert_eq!(to_file_slug("OrderItem"), "orderitem");
/// ```
pub fn to_file_slug(name: &str) -> String {
    name.to_lowercase()
}

/// Capitalizes the first character only, leaving the rest untouched.
///
/// # Examples
/// ```
/// use aquamarine::core::naming::to_exported_name;
///
/// assert_eq!(to_exported_name("paidAt"), "PaidAt");
/// assert_eq!(to_exported_name("userID"), "UserID");
/// ```
pub fn to_exported_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Converts a mixed-case identifier into a lowercase, underscore separated tag.
///
/// Two boundary passes run before lowercasing: the first splits before a
/// title-cased word, the second splits any lowercase-or-digit to uppercase
/// transition. Doubled separators are collapsed and edge separators trimmed.
///
/// # Examples
/// ```
/// use aquamarine::core::naming::to_wire_tag;
///
/// assert_eq!(to_wire_tag("HTTPServer"), "http_server");
/// assert_eq!(to_wire_tag("userID"), "user_id");
/// assert_eq!(to_wire_tag("simpleName"), "simple_name");
/// ```
pub fn to_wire_tag(name: &str) -> String {
    let pass = FIRST_CAP.replace_all(name, "${1}_${2}");
    let pass = ALL_CAP.replace_all(&pass, "${1}_${2}");
    let lowered = pass.to_lowercase();

    let mut tag = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch == '_' && (tag.is_empty() || tag.ends_with('_')) {
            continue;
        }
        tag.push(ch);
    }

    tag.trim_end_matches('_').to_string()
}

/// English pluralization for generated collection names.
///
/// # Examples
/// ```
/// use aquamarine::core::naming::to_plural;
///
/// assert_eq!(to_plural("Invoice"), "Invoices");
/// assert_eq!(to_plural("Category"), "Categories");
/// assert_eq!(to_plural("Box"), "Boxes");
/// ```
pub fn to_plural(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let lower = name.to_lowercase();

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{name}es");
    }

    if let Some(stem) = name.strip_suffix(['y', 'Y']) {
        let before = stem.chars().last().map(|c| c.to_ascii_lowercase());
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            let suffix = if name.ends_with('Y') { "IES" } else { "ies" };
            return format!("{stem}{suffix}");
        }
    }

    format!("{name}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_well_formed_tag(tag: &str) -> bool {
        !tag.is_empty()
            && !tag.starts_with('_')
            && !tag.ends_with('_')
            && !tag.contains("__")
            && tag
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    }

    #[test]
    fn test_to_wire_tag_known_patterns() {
        assert_eq!(to_wire_tag("HTTPServer"), "http_server");
        assert_eq!(to_wire_tag("userID"), "user_id");
        assert_eq!(to_wire_tag("simpleName"), "simple_name");
        assert_eq!(to_wire_tag("orderItemSKU"), "order_item_sku");
        assert_eq!(to_wire_tag("paidAt"), "paid_at");
        assert_eq!(to_wire_tag("total"), "total");
    }

    #[test]
    fn test_to_wire_tag_edges() {
        assert_eq!(to_wire_tag("Name"), "name");
        assert_eq!(to_wire_tag("ID"), "id");
        assert_eq!(to_wire_tag("item2Name"), "item2_name");
        assert_eq!(to_wire_tag("address2"), "address2");
        assert_eq!(to_wire_tag("user2FA"), "user2_fa");
        assert_eq!(to_wire_tag("already_snake"), "already_snake");
        assert_eq!(to_wire_tag("foo_Bar"), "foo_bar");
        assert_eq!(to_wire_tag("_leading"), "leading");
        assert_eq!(to_wire_tag("trailing_"), "trailing");
        assert_eq!(to_wire_tag(""), "");
    }

    #[test]
    fn test_to_wire_tag_never_malformed() {
        let samples = [
            "userID",
            "HTTPServer",
            "simpleName",
            "orderItemSKU",
            "URL",
            "getHTTPResponseCode",
            "aB",
            "Ab",
            "ABc",
            "aBcDe",
            "XMLHttpRequest",
            "ipV4Address",
            "version2",
            "V2Api",
            "createdAtUTC",
        ];
        for sample in samples {
            let tag = to_wire_tag(sample);
            assert!(is_well_formed_tag(&tag), "{sample} -> {tag}");
        }
    }

    #[test]
    fn test_to_exported_name() {
        assert_eq!(to_exported_name("total"), "Total");
        assert_eq!(to_exported_name("paidAt"), "PaidAt");
        assert_eq!(to_exported_name("Invoice"), "Invoice");
        assert_eq!(to_exported_name("éclair"), "Éclair");
        assert_eq!(to_exported_name(""), "");
    }

    #[test]
    fn test_to_file_slug() {
        assert_eq!(to_file_slug("Invoice"), "invoice");
        assert_eq!(to_file_slug("OrderItem"), "orderitem");
        assert_eq!(to_file_slug("billing"), "billing");
    }

    #[test]
    fn test_to_plural() {
        assert_eq!(to_plural("Invoice"), "Invoices");
        assert_eq!(to_plural("Category"), "Categories");
        assert_eq!(to_plural("Day"), "Days");
        assert_eq!(to_plural("Address"), "Addresses");
        assert_eq!(to_plural("Box"), "Boxes");
        assert_eq!(to_plural("Batch"), "Batches");
        assert_eq!(to_plural("user"), "users");
        assert_eq!(to_plural(""), "");
    }
}

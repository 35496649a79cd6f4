//! Identifier normalization.
//!
//! Index names and keyword sub-field names are derived from Rust type and
//! field names. Type names arrive in PascalCase, so they are converted to the
//! snake_case form OpenSearch index names require.

/// Suffix appended to a field name to address its keyword sub-field.
pub const KEYWORD_SUFFIX: &str = ".keyword";

/// Convert a PascalCase or camelCase identifier to snake_case.
///
/// Existing underscores are kept as they are and never doubled. An underscore
/// is inserted before a character when the previous character is not an
/// underscore and either:
///
/// - the character is uppercase and follows a lowercase character, or is
///   uppercase and followed by a lowercase character (`HTTPServer` splits
///   into `http_server`), or
/// - the character is a digit following a non-digit.
///
/// Every character is lowercased.
///
/// `normalize(normalize(x)) == normalize(x)` holds when every uppercase
/// character has a distinct lowercase form, which covers ASCII identifiers.
/// Uppercase characters without one, such as `𝐀`, survive lowercasing and can
/// gain an underscore on a second pass: `"B𝐀"` becomes `"b𝐀"`, then `"b_𝐀"`.
///
/// # Example
///
/// ```
/// use index_schema::naming::normalize;
///
/// assert_eq!(normalize("UserProfile"), "user_profile");
/// assert_eq!(normalize("HTTPServer"), "http_server");
/// ```
pub fn normalize(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let mut output = String::with_capacity(identifier.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if should_underscore(i, &chars) {
            output.push('_');
        }
        output.extend(c.to_lowercase());
    }

    output
}

/// Build an index name from an optional prefix and a type name.
///
/// The prefix is concatenated before normalization, so `("Tenant", "UserProfile")`
/// yields `tenant_user_profile`.
pub fn index_name(prefix: Option<&str>, type_name: &str) -> String {
    normalize(&format!("{}{}", prefix.unwrap_or_default(), type_name))
}

/// Name of the keyword sub-field for a field.
///
/// Only the first character of the field name is lowercased; the name is not
/// re-segmented.
pub fn keyword_name(field_name: &str) -> String {
    format!("{}{}", lower_first(field_name), KEYWORD_SUFFIX)
}

/// Lowercase the first character of a string, leaving the rest untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn should_underscore(i: usize, chars: &[char]) -> bool {
    if i == 0 || i >= chars.len() || chars[i] == '_' {
        return false;
    }

    let curr = chars[i];
    let prev = chars[i - 1];
    // The last two positions look past the end, which reads as an underscore.
    let next = if i + 2 < chars.len() { chars[i + 1] } else { '_' };

    prev != '_'
        && ((curr.is_uppercase() && (prev.is_lowercase() || next.is_lowercase()))
            || (curr.is_numeric() && !prev.is_numeric()))
}

/// Uppercase the first character, leaving the rest untouched.
///
/// # Examples
/// ```
/// use grove_core::utils::capitalize;
/// assert_eq!(capitalize("call"), "Call");
/// assert_eq!(capitalize("QualifiedName"), "QualifiedName");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Remove a leading internal-sort marker such as `_`.
pub fn strip_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    name.strip_prefix(prefix).unwrap_or(name)
}

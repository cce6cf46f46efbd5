/// Canonical form of a two-letter country code: trimmed and uppercased.
/// Returns `None` unless the input is exactly two ASCII letters.
pub fn normalize_country_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

//! Token extraction from grid rows

/// Splits a grid row into cell tokens.
///
/// Tokens are separated by whitespace, commas, or both. Empty fields between
/// consecutive commas are skipped, so `"a,,b"` yields two tokens.
///
/// # Examples
///
/// ```
/// use craftgrid::tokenizer::tokenize;
///
/// assert_eq!(tokenize("- coal -"), vec!["-", "coal", "-"]);
/// assert_eq!(tokenize("stick, stick ,-"), vec!["stick", "stick", "-"]);
/// ```
pub fn tokenize(row: &str) -> Vec<&str> {
    row.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()).collect()
}

/// True if `token` can be written in a grid row without being split apart.
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(|c| c == ',' || c.is_whitespace())
}

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_pair_of_quotes() {
        assert_eq!(clean_str("  \"NSW1\" "), "NSW1");
        assert_eq!(clean_str("\"\"x\"\""), "\"x\"");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str(" plain\t"), "plain");
    }
}

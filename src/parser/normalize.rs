/// Bullet glyph the assistant is told to put in front of ingredient lines.
pub const BULLET: char = '•';

/// Normalize one raw line of an assistant message.
///
/// Trims surrounding whitespace and a single leading [`BULLET`]. Returns
/// `None` when nothing is left, which callers treat as a blank line.
pub fn normalize_line(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let stripped = trimmed
        .strip_prefix(BULLET)
        .map(str::trim_start)
        .unwrap_or(trimmed);

    if stripped.is_empty() {
        None
    } else {
        Some(stripped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_bullet_and_whitespace() {
        assert_eq!(normalize_line("  • 2 cups flour  "), Some("2 cups flour"));
        assert_eq!(normalize_line("•1 egg"), Some("1 egg"));
        assert_eq!(normalize_line("\t1. Mix\r"), Some("1. Mix"));
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(normalize_line(""), None);
        assert_eq!(normalize_line("   \t "), None);
        assert_eq!(normalize_line(" • "), None);
    }

    #[test]
    fn test_only_leading_bullet_is_removed() {
        assert_eq!(normalize_line("salt • pepper"), Some("salt • pepper"));
    }
}

use regex::Regex;
use std::sync::LazyLock;

use super::section::{TITLE_GLYPH, TITLE_KEYWORD};

/// `Name (Pronunciation) (EnglishName)`
static BILINGUAL_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)\s*\((.+?)\)\s*\((.+?)\)").unwrap());

/// Extract the recipe title from a title header line.
///
/// A bilingual title such as `麻婆豆腐 (Mápó dòufu) (Mapo Tofu)` is
/// shortened to `麻婆豆腐 (Mapo Tofu)`. Returns `None` if the header
/// carries no title text.
pub fn parse_title_line(line: &str) -> Option<String> {
    let after_keyword = line
        .find(TITLE_KEYWORD)
        .map(|idx| &line[idx + TITLE_KEYWORD.len()..])
        .unwrap_or(line);

    let cleaned = after_keyword.replace(TITLE_GLYPH, "");
    let cleaned = cleaned
        .trim()
        .trim_start_matches([':', '：'])
        .trim();

    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = BILINGUAL_TITLE_RE.captures(cleaned) {
        let native = caps[1].trim();
        let english = caps[3].trim();
        return Some(format!("{native} ({english})"));
    }

    Some(cleaned.to_string())
}

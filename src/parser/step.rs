use regex::Regex;
use std::sync::LazyLock;

static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+[\.、]?\s*").unwrap());

/// Parse one steps-section line, dropping a leading `1.` / `3、` ordinal.
///
/// The remaining instruction text is kept verbatim. A line that is empty
/// or holds nothing but an ordinal yields `None`.
pub fn parse_step_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let step = ORDINAL_RE.replace(line, "");
    if step.is_empty() {
        None
    } else {
        Some(step.into_owned())
    }
}

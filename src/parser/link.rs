use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s]+").unwrap());
static BARE_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"www\.[^\s]+").unwrap());

/// Find a URL in one link-section line.
///
/// A full `http(s)://` URL wins; otherwise a scheme-less `www.` domain is
/// upgraded to `https://`. Lines such as "Sorry, no link available" give `None`.
pub fn parse_link_line(line: &str) -> Option<String> {
    if let Some(url) = URL_RE.find(line) {
        return Some(url.as_str().to_string());
    }

    BARE_DOMAIN_RE
        .find(line)
        .map(|domain| format!("https://{}", domain.as_str()))
}

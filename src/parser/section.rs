use serde::Deserialize;

/// Glyph that opens the title line.
pub const TITLE_GLYPH: &str = "🥙";
/// Keyword that must accompany [`TITLE_GLYPH`] on the title line.
pub const TITLE_KEYWORD: &str = "Recipe Name";
pub const INGREDIENTS_MARKER: &str = "【Ingredients】";
pub const STEPS_MARKER: &str = "【Cooking Steps】";
pub const LINK_MARKER: &str = "【Recipe Link】";
pub const TIPS_MARKER: &str = "【Friendly Reminder】";

/// Parsing context a content line is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    Title,
    Ingredients,
    Steps,
    Link,
    Tips,
}

impl Section {
    /// State after a header line for `header` was seen while in `self`.
    ///
    /// Every header moves to its own section; there is no closing
    /// transition, a section stays current until the next header.
    pub fn transition(self, header: Section) -> Section {
        match (self, header) {
            (current, Section::None) => current,
            (_, Section::Title) => Section::Title,
            (_, Section::Ingredients) => Section::Ingredients,
            (_, Section::Steps) => Section::Steps,
            (_, Section::Link) => Section::Link,
            (_, Section::Tips) => Section::Tips,
        }
    }
}

/// How header lines are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerMatching {
    /// The marker must open the line, after any decorative glyphs.
    #[default]
    Anchored,
    /// The marker may appear anywhere in the line.
    Contains,
}

/// Classification of a single normalized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Header(Section),
    Content,
}

const BRACKET_MARKERS: [(&str, Section); 4] = [
    (INGREDIENTS_MARKER, Section::Ingredients),
    (STEPS_MARKER, Section::Steps),
    (LINK_MARKER, Section::Link),
    (TIPS_MARKER, Section::Tips),
];

/// Decide whether `line` is a section header.
pub fn classify(line: &str, matching: MarkerMatching) -> LineClass {
    if is_title_line(line, matching) {
        return LineClass::Header(Section::Title);
    }

    for (marker, section) in BRACKET_MARKERS {
        let found = match matching {
            MarkerMatching::Anchored => strip_decoration(line).starts_with(marker),
            MarkerMatching::Contains => line.contains(marker),
        };
        if found {
            return LineClass::Header(section);
        }
    }

    LineClass::Content
}

fn is_title_line(line: &str, matching: MarkerMatching) -> bool {
    match matching {
        MarkerMatching::Anchored => {
            let body = strip_decoration(line);
            let prefix = &line[..line.len() - body.len()];
            prefix.contains(TITLE_GLYPH) && body.starts_with(TITLE_KEYWORD)
        }
        MarkerMatching::Contains => line.contains(TITLE_GLYPH) && line.contains(TITLE_KEYWORD),
    }
}

/// Skip leading emoji, bullets, markdown emphasis and whitespace.
fn strip_decoration(line: &str) -> &str {
    line.trim_start_matches(|c: char| !(c.is_alphanumeric() || c == '【'))
}

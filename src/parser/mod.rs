//! Turns a semi-structured assistant reply into a [`ParsedRecipe`].
//!
//! Lines are normalized, classified as section headers or content, and
//! content is handed to the parser of the section that is current at that
//! point. Parsing is total: any string produces a recipe, malformed lines
//! only mean fewer populated fields.

mod ingredient;
mod link;
mod normalize;
mod section;
mod step;
mod title;

pub use ingredient::{parse_ingredient_line, DEFAULT_QUANTITY, DEFAULT_UNIT};
pub use link::parse_link_line;
pub use normalize::{normalize_line, BULLET};
pub use section::{
    classify, LineClass, MarkerMatching, Section, INGREDIENTS_MARKER, LINK_MARKER, STEPS_MARKER,
    TIPS_MARKER, TITLE_GLYPH, TITLE_KEYWORD,
};
pub use step::parse_step_line;
pub use title::parse_title_line;

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::{default_expiration_days, ParserConfig};
use crate::model::ParsedRecipe;

/// Stateless reply parser. Cheap to copy and safe to share across threads.
#[derive(Debug, Clone, Copy)]
pub struct RecipeParser {
    expiration_days: i64,
    matching: MarkerMatching,
}

impl Default for RecipeParser {
    fn default() -> Self {
        Self {
            expiration_days: default_expiration_days(),
            matching: MarkerMatching::default(),
        }
    }
}

impl RecipeParser {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            expiration_days: config.expiration_days,
            matching: config.marker_matching,
        }
    }

    pub fn with_expiration_days(mut self, days: i64) -> Self {
        self.expiration_days = days;
        self
    }

    pub fn with_marker_matching(mut self, matching: MarkerMatching) -> Self {
        self.matching = matching;
        self
    }

    /// Parse `message`, dating ingredient expirations from now.
    pub fn parse(&self, message: &str) -> ParsedRecipe {
        self.parse_at(message, Utc::now())
    }

    /// Parse `message` with expirations offset from `now`.
    pub fn parse_at(&self, message: &str, now: DateTime<Utc>) -> ParsedRecipe {
        let mut assembler = Assembler::new(self, now);
        for raw in message.lines() {
            assembler.feed(raw);
        }
        assembler.finish(message)
    }
}

/// Accumulating state for one message.
struct Assembler<'p> {
    parser: &'p RecipeParser,
    now: DateTime<Utc>,
    section: Section,
    is_parsed: bool,
    recipe: ParsedRecipe,
    tips: String,
    unparsed: String,
}

impl<'p> Assembler<'p> {
    fn new(parser: &'p RecipeParser, now: DateTime<Utc>) -> Self {
        Self {
            parser,
            now,
            section: Section::None,
            is_parsed: false,
            recipe: ParsedRecipe::default(),
            tips: String::new(),
            unparsed: String::new(),
        }
    }

    fn feed(&mut self, raw: &str) {
        let Some(line) = normalize_line(raw) else {
            return;
        };

        if let LineClass::Header(header) = classify(line, self.parser.matching) {
            debug!("Section header {header:?}: {line:?}");
            self.is_parsed = true;
            self.section = self.section.transition(header);
            if header == Section::Title {
                self.recipe.title = parse_title_line(line);
            }
            return;
        }

        match self.section {
            Section::Ingredients => {
                if let Some(ingredient) =
                    parse_ingredient_line(line, self.now, self.parser.expiration_days)
                {
                    self.recipe.ingredients.push(ingredient);
                }
            }
            Section::Steps => {
                if let Some(step) = parse_step_line(line) {
                    self.recipe.steps.push(step);
                }
            }
            Section::Link => {
                self.recipe.link = parse_link_line(line);
                if self.recipe.link.is_none() {
                    debug!("No link found in {line:?}");
                }
            }
            Section::Tips => {
                self.tips.push_str(line);
                self.tips.push('\n');
            }
            Section::None | Section::Title => {
                self.unparsed.push_str(raw.trim_end());
                self.unparsed.push('\n');
            }
        }
    }

    fn finish(self, message: &str) -> ParsedRecipe {
        if !self.is_parsed {
            debug!("No section markers found, keeping reply unparsed");
            return ParsedRecipe::unstructured(message);
        }

        let mut recipe = self.recipe;
        recipe.tips = non_empty(self.tips.trim());
        recipe.unparsed_content = non_empty(self.unparsed.trim_end());
        recipe
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANCAKES: &str = "🥙 Recipe Name: Pancakes
🥬【Ingredients】
• 2 cups flour
• 1 egg
🍳【Cooking Steps】
1. Mix ingredients.
2. Cook on griddle.
🔗【Recipe Link】
https://example.com/pancakes";

    #[test]
    fn test_end_to_end_template() {
        let recipe = RecipeParser::default().parse(PANCAKES);

        assert_eq!(recipe.title.as_deref(), Some("Pancakes"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].quantity, 2.0);
        assert_eq!(recipe.ingredients[0].unit, "cups");
        assert_eq!(recipe.ingredients[0].name, "flour");
        assert_eq!(recipe.ingredients[1].quantity, 1.0);
        assert_eq!(recipe.ingredients[1].unit, "unit");
        assert_eq!(recipe.ingredients[1].name, "egg");
        assert_eq!(recipe.steps, vec!["Mix ingredients.", "Cook on griddle."]);
        assert_eq!(recipe.link.as_deref(), Some("https://example.com/pancakes"));
        assert_eq!(recipe.tips, None);
        assert_eq!(recipe.unparsed_content, None);
    }

    #[test]
    fn test_tips_accumulate_and_are_trimmed() {
        let message = "👩🏻‍🍳【Friendly Reminder】
Rest the batter for 10 minutes.

Use a non-stick pan.
";
        let recipe = RecipeParser::default().parse(message);
        assert_eq!(
            recipe.tips.as_deref(),
            Some("Rest the batter for 10 minutes.\nUse a non-stick pan.")
        );
    }

    #[test]
    fn test_no_markers_keeps_whole_message() {
        let message = "  Sure! What ingredients do you have?\n\n• 2 eggs\n";
        let recipe = RecipeParser::default().parse(message);
        assert_eq!(recipe.unparsed_content.as_deref(), Some(message));
        assert!(recipe.title.is_none());
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.steps.is_empty());
        assert!(recipe.link.is_none());
        assert!(recipe.tips.is_none());
    }

    #[test]
    fn test_lines_before_first_marker_are_unparsed() {
        let message = "Here is a recipe for you:   \n\n🥬【Ingredients】\n• 1 onion";
        let recipe = RecipeParser::default().parse(message);
        assert_eq!(
            recipe.unparsed_content.as_deref(),
            Some("Here is a recipe for you:")
        );
        assert_eq!(recipe.ingredients.len(), 1);
    }

    #[test]
    fn test_text_after_title_is_unparsed() {
        let message = "🥙 Recipe Name: Soup\nA cozy dinner.\n🍳【Cooking Steps】\n1. Boil";
        let recipe = RecipeParser::default().parse(message);
        assert_eq!(recipe.title.as_deref(), Some("Soup"));
        assert_eq!(recipe.unparsed_content.as_deref(), Some("A cozy dinner."));
        assert_eq!(recipe.steps, vec!["Boil"]);
    }

    #[test]
    fn test_last_link_line_decides() {
        let message = "🔗【Recipe Link】
https://first.example/a
www.second.example/b";
        let recipe = RecipeParser::default().parse(message);
        assert_eq!(
            recipe.link.as_deref(),
            Some("https://www.second.example/b")
        );

        let message = "🔗【Recipe Link】
https://first.example/a
Sorry, no link available";
        let recipe = RecipeParser::default().parse(message);
        assert!(recipe.link.is_none());
    }

    #[test]
    fn test_ellipsis_placeholder_skipped() {
        let message = "🥬【Ingredients】\n• 2 apples\n• ...\n";
        let recipe = RecipeParser::default().parse(message);
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].name, "apples");
    }

    #[test]
    fn test_idempotent() {
        let parser = RecipeParser::default();
        let now = Utc::now();
        let first = parser.parse_at(PANCAKES, now);
        let second = parser.parse_at(PANCAKES, now);
        assert_eq!(first, second);
        assert_ne!(first.ingredients[0].id, second.ingredients[0].id);
    }

    #[test]
    fn test_idempotent_without_fixed_clock() {
        let parser = RecipeParser::default();
        assert_eq!(parser.parse(PANCAKES), parser.parse(PANCAKES));
    }

    #[test]
    fn test_total_on_odd_input() {
        let parser = RecipeParser::default();
        for input in ["", "   ", "\n\n", "【", "】【", "((()", "🥙", "1.\n2."] {
            let recipe = parser.parse(input);
            assert_eq!(recipe.unparsed_content.as_deref(), Some(input));
            assert!(!recipe.has_structure());
        }
    }

    #[test]
    fn test_contains_matching_switches_on_inline_marker() {
        let message = "🍳【Cooking Steps】\n1. Read the 【Friendly Reminder】 first\n2. Cook";
        let anchored = RecipeParser::default().parse(message);
        assert_eq!(anchored.steps.len(), 2);

        let contains = RecipeParser::default()
            .with_marker_matching(MarkerMatching::Contains)
            .parse(message);
        assert!(contains.steps.is_empty());
        assert_eq!(contains.tips.as_deref(), Some("2. Cook"));
    }

    #[test]
    fn test_expiration_days_configurable() {
        let now = Utc::now();
        let recipe = RecipeParser::default()
            .with_expiration_days(7)
            .parse_at("🥬【Ingredients】\n1 leek", now);
        assert_eq!(
            recipe.ingredients[0].expiration_date,
            (now + chrono::Duration::days(7)).date_naive()
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let message = PANCAKES.replace('\n', "\r\n");
        let recipe = RecipeParser::default().parse(&message);
        assert_eq!(recipe.title.as_deref(), Some("Pancakes"));
        assert_eq!(recipe.steps.len(), 2);
        assert_eq!(recipe.link.as_deref(), Some("https://example.com/pancakes"));
    }
}

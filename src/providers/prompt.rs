use crate::parser::{INGREDIENTS_MARKER, LINK_MARKER, STEPS_MARKER, TIPS_MARKER, TITLE_KEYWORD};

/// The system prompt that asks the assistant for the sectioned recipe template.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro. Its section markers must match what
/// [`crate::parser`] recognizes.
pub const RECIPE_ASSISTANT_PROMPT: &str = include_str!("prompt.txt");

/// Build the system prompt, optionally asking for replies in a given language.
///
/// Section markers stay in English either way so replies remain parseable.
pub fn build_system_prompt(language: Option<&str>) -> String {
    match language.map(str::trim).filter(|lang| !lang.is_empty()) {
        Some(lang) => format!(
            "{}\n\nWrite the recipe content in {lang}, but keep every section marker exactly as shown above.",
            RECIPE_ASSISTANT_PROMPT
        ),
        None => RECIPE_ASSISTANT_PROMPT.to_string(),
    }
}

/// Markers the template in [`RECIPE_ASSISTANT_PROMPT`] must contain.
pub fn template_markers() -> [&'static str; 5] {
    [
        TITLE_KEYWORD,
        INGREDIENTS_MARKER,
        STEPS_MARKER,
        LINK_MARKER,
        TIPS_MARKER,
    ]
}

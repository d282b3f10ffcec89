use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::model::ParsedIngredient;

/// Unit recorded when the line names none.
pub const DEFAULT_UNIT: &str = "unit";
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Placeholders the assistant copies from the template instead of a real line.
const ELLIPSES: [&str; 2] = ["...", "…"];

/// `<quantity> [<unit>] <name>`
static QUANTITY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*)\s*([^\d\s]+)?\s+(.+)$").unwrap());

/// Parse one normalized ingredients-section line.
///
/// Lines without a leading quantity become `1 unit <line>`. Returns `None`
/// for template ellipses and for lines that leave no name behind.
pub fn parse_ingredient_line(
    line: &str,
    now: DateTime<Utc>,
    expiration_days: i64,
) -> Option<ParsedIngredient> {
    let line = line.trim();
    if line.is_empty() || ELLIPSES.contains(&line) {
        return None;
    }

    let (quantity, unit, name) = match QUANTITY_LINE_RE.captures(line) {
        Some(caps) => {
            let quantity = caps[1]
                .parse::<f64>()
                .ok()
                .filter(|q| q.is_finite() && *q > 0.0)
                .unwrap_or(DEFAULT_QUANTITY);
            let unit = caps
                .get(2)
                .map(|m| m.as_str())
                .unwrap_or(DEFAULT_UNIT);
            (quantity, unit, clean_name(caps.get(3).map_or("", |m| m.as_str())))
        }
        None => (DEFAULT_QUANTITY, DEFAULT_UNIT, clean_name(line)),
    };

    if name.is_empty() {
        debug!("Skipping ingredient line without a name: {line:?}");
        return None;
    }

    let ingredient = ParsedIngredient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        expiration_date: expiration_from(now, expiration_days),
    };
    debug!("Parsed ingredient: {ingredient:?}");
    Some(ingredient)
}

/// Expiry is a calendar date, so parses on the same day agree.
fn expiration_from(now: DateTime<Utc>, days: i64) -> NaiveDate {
    let today = now.date_naive();
    Duration::try_days(days)
        .and_then(|offset| today.checked_add_signed(offset))
        .unwrap_or(today)
}

fn clean_name(raw: &str) -> &str {
    raw.trim().trim_end_matches([',', ';', '.', '，', '。']).trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<ParsedIngredient> {
        parse_ingredient_line(line, Utc::now(), 3)
    }

    #[test]
    fn test_quantity_unit_name() {
        let ing = parse("2 cups flour").unwrap();
        assert_eq!(ing.quantity, 2.0);
        assert_eq!(ing.unit, "cups");
        assert_eq!(ing.name, "flour");
    }

    #[test]
    fn test_quantity_without_unit() {
        let ing = parse("1 egg").unwrap();
        assert_eq!(ing.quantity, 1.0);
        assert_eq!(ing.unit, "unit");
        assert_eq!(ing.name, "egg");

        let ing = parse("2 apples").unwrap();
        assert_eq!(ing.quantity, 2.0);
        assert_eq!(ing.unit, "unit");
        assert_eq!(ing.name, "apples");
    }

    #[test]
    fn test_decimal_and_attached_unit() {
        let ing = parse("1.5 kg beef chuck").unwrap();
        assert_eq!(ing.quantity, 1.5);
        assert_eq!(ing.unit, "kg");
        assert_eq!(ing.name, "beef chuck");

        let ing = parse("200g sugar").unwrap();
        assert_eq!(ing.quantity, 200.0);
        assert_eq!(ing.unit, "g");
        assert_eq!(ing.name, "sugar");
    }

    #[test]
    fn test_free_form_line_gets_defaults() {
        let ing = parse("Salt").unwrap();
        assert_eq!(ing.quantity, 1.0);
        assert_eq!(ing.unit, "unit");
        assert_eq!(ing.name, "Salt");

        let ing = parse("Black pepper to taste").unwrap();
        assert_eq!(ing.name, "Black pepper to taste");
    }

    #[test]
    fn test_zero_quantity_defaults_to_one() {
        let ing = parse("0 cups water").unwrap();
        assert_eq!(ing.quantity, 1.0);
        assert_eq!(ing.unit, "cups");
    }

    #[test]
    fn test_trailing_punctuation_removed_from_name() {
        let ing = parse("3 cloves garlic,").unwrap();
        assert_eq!(ing.name, "garlic");
        assert_eq!(ing.unit, "cloves");
    }

    #[test]
    fn test_ellipsis_and_blank_produce_nothing() {
        assert!(parse("...").is_none());
        assert!(parse("…").is_none());
        assert!(parse("   ").is_none());
        assert!(parse(".").is_none());
    }

    #[test]
    fn test_expiration_offset() {
        let now = Utc::now();
        let ing = parse_ingredient_line("1 lemon", now, 3).unwrap();
        assert_eq!(ing.expiration_date, (now + Duration::days(3)).date_naive());
    }

    #[test]
    fn test_expiration_ignores_time_of_day() {
        let morning = DateTime::parse_from_rfc3339("2024-05-01T06:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let evening = DateTime::parse_from_rfc3339("2024-05-01T23:59:59.999Z")
            .unwrap()
            .with_timezone(&Utc);
        let a = parse_ingredient_line("1 lemon", morning, 3).unwrap();
        let b = parse_ingredient_line("1 lemon", evening, 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.expiration_date,
            NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()
        );
    }

    #[test]
    fn test_name_borrowed_from_line() {
        let ing = parse("12 oz linguine pasta.").unwrap();
        assert_eq!(ing.name, "linguine pasta");
        assert_eq!(ing.unit, "oz");
    }

    #[test]
    fn test_ids_are_unique_per_parse() {
        let a = parse("1 egg").unwrap();
        let b = parse("1 egg").unwrap();
        assert_ne!(a.id, b.id);
    }
}

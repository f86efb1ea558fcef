//! Title search.
//!
//! The search text is a case-insensitive regular expression. Text that does
//! not compile filters nothing out, so a half-typed pattern such as `(tea`
//! shows the whole collection instead of failing.

use regex::{Regex, RegexBuilder};

use crate::models::Recipe;

/// Compiled title filter.
#[derive(Debug, Clone)]
pub struct TitleFilter {
    regex: Option<Regex>,
}

impl TitleFilter {
    pub fn new(pattern: &str) -> Self {
        if pattern.trim().is_empty() {
            return Self { regex: None };
        }

        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::debug!(pattern, "ignoring invalid search pattern: {}", e);
                None
            }
        };

        Self { regex }
    }

    /// Returns false when the pattern was blank or invalid.
    pub fn is_active(&self) -> bool {
        self.regex.is_some()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.regex
            .as_ref()
            .map_or(true, |regex| regex.is_match(&recipe.title))
    }
}

/// Returns the recipes whose title matches `pattern`, in collection order.
pub fn filter_recipes<'a>(recipes: &'a [Recipe], pattern: &str) -> Vec<&'a Recipe> {
    let filter = TitleFilter::new(pattern);
    recipes.iter().filter(|r| filter.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipes() -> Vec<Recipe> {
        vec![
            Recipe::new("1", "Green Tea"),
            Recipe::new("2", "Tomato Soup"),
            Recipe::new("3", "Iced tea"),
            Recipe::new("4", "Sourdough"),
        ]
    }

    fn titles(found: Vec<&Recipe>) -> Vec<&str> {
        found.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_case_insensitive_match() {
        let recipes = recipes();
        assert_eq!(titles(filter_recipes(&recipes, "TEA")), vec!["Green Tea", "Iced tea"]);
    }

    #[test]
    fn test_regex_match() {
        let recipes = recipes();
        assert_eq!(titles(filter_recipes(&recipes, "^so")), vec!["Sourdough"]);
        assert_eq!(
            titles(filter_recipes(&recipes, "soup|dough")),
            vec!["Tomato Soup", "Sourdough"]
        );
    }

    #[test]
    fn test_invalid_pattern_returns_everything() {
        let recipes = recipes();
        let filter = TitleFilter::new("[unclosed");
        assert!(!filter.is_active());
        assert_eq!(filter_recipes(&recipes, "[unclosed").len(), recipes.len());
        assert_eq!(filter_recipes(&recipes, "(tea").len(), recipes.len());
    }

    #[test]
    fn test_blank_pattern_returns_everything() {
        let recipes = recipes();
        assert_eq!(filter_recipes(&recipes, "").len(), 4);
        assert_eq!(filter_recipes(&recipes, "   ").len(), 4);
    }

    #[test]
    fn test_no_match() {
        let recipes = recipes();
        assert!(filter_recipes(&recipes, "pizza").is_empty());
    }
}

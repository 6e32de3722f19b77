use once_cell::sync::Lazy;
use scraper::Html;
use serde_json::Value;

use super::dom::{self, Css, Pattern};

pub const MAX_SUGGESTIONS: usize = 10;

static SUGGESTION_ITEMS: Lazy<Vec<Css>> = Lazy::new(|| {
    Css::list(&[
        "li.suggestion-item",
        "div.autocomplete-suggestion",
        "option",
        "li[role='option']",
    ])
});
static SUGGESTION_CLASS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)suggest|autocomplete"));

/// Reads an autocomplete response. The OpenSearch shape `[query, [s1, s2, ..]]`
/// is tried first, then suggestion-looking markup. At most
/// [`MAX_SUGGESTIONS`] entries, duplicates removed in encounter order.
pub fn parse_suggestions(response: &str) -> Vec<String> {
    match from_json(response) {
        Some(suggestions) => suggestions,
        None => from_markup(response),
    }
}

fn from_json(response: &str) -> Option<Vec<String>> {
    let Ok(Value::Array(data)) = serde_json::from_str::<Value>(response.trim()) else {
        return None;
    };
    let items = data.get(1)?.as_array()?;
    let mut suggestions = Vec::new();
    for item in items {
        let text = match item {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        push_unique(&mut suggestions, text);
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    Some(suggestions)
}

fn from_markup(response: &str) -> Vec<String> {
    let document = Html::parse_document(response);
    let root = document.root_element();

    let mut elements: Vec<_> = SUGGESTION_ITEMS
        .iter()
        .flat_map(|css| css.all(root))
        .collect();
    if elements.is_empty() {
        elements = dom::elements_with_class(root, &["li", "div"], &SUGGESTION_CLASS);
    }

    let mut suggestions = Vec::new();
    for el in elements {
        let text = dom::attr_any(el, &["value", "data-suggestion"])
            .map(str::to_string)
            .unwrap_or_else(|| dom::extract_text(el));
        push_unique(&mut suggestions, text);
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}

fn push_unique(suggestions: &mut Vec<String>, text: String) {
    let text = text.trim();
    if !text.is_empty() && !suggestions.iter().any(|s| s == text) {
        suggestions.push(text.to_string());
    }
}

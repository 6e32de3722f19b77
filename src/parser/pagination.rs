use once_cell::sync::Lazy;
use scraper::Html;

use super::dom::{self, Css, Pattern};

static COUNT_ID: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)results?_?count|num_results|search_stats|result-stats"));
static COUNT_CLASS: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)results?-?info|stats-text|summary"));
static MAIN_CONTENT: Lazy<Vec<Css>> = Lazy::new(|| Css::list(&["main", "div#main_results"]));
static COUNT_PHRASES: Lazy<Vec<Pattern>> = Lazy::new(|| {
    [
        r"(?i)([0-9,]+)\s*(?:results|Ergebnisse|résultats|risultati|resultados|resultaten)",
        r"(?i)About\s*([0-9,]+)",
        r"(?i)Approximately\s*([0-9,]+)",
        r"(?i)Displaying\s*[\d,-]+\s*of\s*([0-9,]+)",
        r"(?i)([0-9,]+)\s*items found",
    ]
    .into_iter()
    .map(Pattern::new)
    .collect()
});

static NEXT_LABEL: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)next|more\s*results|>>|load\s*more"));
static NEXT_CLASS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)next|pagination-next"));
static PAGINATION_LABEL: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)pagination"));
static TRAILING_ARROW: Lazy<Pattern> = Lazy::new(|| Pattern::new(r">\s*$"));

/// Estimated total hit count, 0 when the page gives no usable hint.
pub fn extract_total_results(document: &Html) -> u64 {
    let root = document.root_element();

    let mut sources: Vec<String> = dom::elements_with_id(root, &["div", "span", "p"], &COUNT_ID)
        .into_iter()
        .chain(dom::elements_with_class(root, &["div", "p"], &COUNT_CLASS))
        .map(dom::extract_text)
        .collect();

    if sources.is_empty() {
        let main = dom::first_hit(&MAIN_CONTENT, root)
            .into_iter()
            .next()
            .unwrap_or(root);
        sources.push(dom::extract_text(main));
    }

    for text in &sources {
        for phrase in COUNT_PHRASES.iter() {
            let Some(number) = phrase.capture(text, 1) else {
                continue;
            };
            if let Ok(total) = number.replace(',', "").parse::<u64>() {
                return total;
            }
        }
    }
    0
}

/// Whether the page offers an enabled control leading to more results.
pub fn has_next_page(document: &Html) -> bool {
    let root = document.root_element();

    let labelled_next = dom::elements_where(root, &["a", "button"], |el| {
        if dom::is_disabled(*el) {
            return false;
        }
        let value = el.value();
        NEXT_LABEL.is_match(&dom::extract_text(*el))
            || value.attr("title").is_some_and(|t| NEXT_LABEL.is_match(t))
            || value.attr("aria-label").is_some_and(|t| NEXT_LABEL.is_match(t))
            || value.attr("class").is_some_and(|c| NEXT_CLASS.is_match(c))
    });
    if !labelled_next.is_empty() {
        return true;
    }

    let navs = dom::elements_where(root, &["nav", "div"], |el| {
        el.value().attr("role") == Some("navigation")
            && el
                .value()
                .attr("aria-label")
                .is_some_and(|l| PAGINATION_LABEL.is_match(l))
    });
    navs.into_iter().any(|nav| {
        let controls = dom::elements_where(nav, &["a", "button"], |_| true);
        let Some(last) = controls.last() else {
            return false;
        };
        let label = dom::extract_text(*last).to_lowercase();
        let reads_next =
            label.contains("next") || TRAILING_ARROW.is_match(&label) || label.contains('\u{2192}');
        reads_next && !dom::is_disabled(*last)
    })
}

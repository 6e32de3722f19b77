//! Instant answers and knowledge panels.
//!
//! Each detector looks for one kind of answer and gives up quietly. Answers
//! and panels are tried in a fixed order and the first hit of each kind wins.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};

use super::dom::{self, Css, Pattern};
use crate::data_models::{InstantAnswerBundle, KnowledgePanel};

pub const STARTPAGE_KNOWLEDGE_SOURCE: &str = "Startpage Knowledge";
pub const KNOWLEDGE_PANEL_SOURCE: &str = "Knowledge Panel";

const PANEL_DESCRIPTION_CHARS: usize = 800;
const WEATHER_ANSWER_CHARS: usize = 100;

const QUESTION_INDICATORS: &[&str] = &[
    "what is",
    "what are",
    "who is",
    "who are",
    "how much",
    "how many",
    "when is",
    "where is",
    "define",
    "definition",
    "time in",
];
const TIME_KEYWORDS: &[&str] = &["time", "date", "today", "now"];

static EXPANDER_CLASS: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)sxpr|search-expander|sx-|wiki"));
static HEADING: Lazy<Css> = Lazy::new(|| Css::new("h1, h2, h3, h4"));
static ROLE_HEADING: Lazy<Css> = Lazy::new(|| {
    Css::new(
        "h1[role='heading'], h2[role='heading'], h3[role='heading'], h4[role='heading'], div[role='heading']",
    )
});
static PARAGRAPH: Lazy<Css> = Lazy::new(|| Css::new("p"));
static FACT_NAME: Lazy<Css> = Lazy::new(|| Css::new("dt, th"));

static CALCULATOR: Lazy<Vec<Pattern>> = Lazy::new(|| {
    [
        r#"(?i)<span class="wob_t" style="display:inline">([-−]?[\d,.]+)</span>"#,
        r#"(?i)id="cwos">([-−]?[\d,.]+)</span>"#,
        r#"(?i)<div class="vk_ans">([-−]?[\d,.]+)</div>"#,
        r#"(?i)calc_result_val">([-−]?[\d,.\s]+)</span>"#,
        r"(?i)(?:=\s*|is\s*|equals\s*)([-−]?[\d,.\s]*\d[\d,.]*(?:\s*[A-Za-z%]+)?)",
    ]
    .into_iter()
    .map(Pattern::new)
    .collect()
});
static TIME_DATE: Lazy<Vec<Pattern>> = Lazy::new(|| {
    [
        r"(?i)\b\d{1,2}:\d{2}(?::\d{2})?\s*(?:AM|PM)?\b",
        r"(?i)\b(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun)\b, \w+ \d{1,2}, \d{4}",
        r"(?i)\b\w+ \d{1,2}, \d{4}\b",
        r"(?i)\b\d{1,2}/\d{1,2}/\d{2,4}\b",
    ]
    .into_iter()
    .map(Pattern::new)
    .collect()
});
static WEATHER_CLASS: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)temp|weather|climate|condition|forecast"));
static WEATHER_TEXT: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)\d+°[CF]?|\b(?:Sunny|Cloudy|Rain|Snow)\b"));
static PANEL_CLASS: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(r"(?i)infobox|summary|description|knowledge|fact|panel|entity")
});

/// Runs every detector over one results page.
pub fn extract_instant_answers(html: &str, query: &str) -> InstantAnswerBundle {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let expanders = dom::elements_with_class(root, &["div", "section"], &EXPANDER_CLASS);

    let instant_answer = answer_from_expanders(&expanders, query)
        .or_else(|| calculator_answer(html))
        .or_else(|| time_date_answer(html, query))
        .or_else(|| weather_answer(root, query));

    let knowledge_panel = panel_from_expanders(&expanders).or_else(|| generic_panel(root));

    resolve_duplicates(instant_answer, knowledge_panel)
}

/// Keeps the same fact from being shown twice. When one text contains the
/// other, a titled panel wins over the answer; otherwise the answer wins.
pub fn resolve_duplicates(
    instant_answer: Option<String>,
    knowledge_panel: Option<KnowledgePanel>,
) -> InstantAnswerBundle {
    let duplicated = match (&instant_answer, &knowledge_panel) {
        (Some(answer), Some(panel)) if !panel.description.is_empty() => {
            panel.description.contains(answer.as_str()) || answer.contains(&panel.description)
        }
        _ => false,
    };
    if !duplicated {
        return InstantAnswerBundle {
            instant_answer,
            knowledge_panel,
        };
    }

    let panel_has_title = knowledge_panel
        .as_ref()
        .is_some_and(|panel| !panel.title.is_empty());
    if panel_has_title {
        InstantAnswerBundle {
            instant_answer: None,
            knowledge_panel,
        }
    } else {
        InstantAnswerBundle {
            instant_answer,
            knowledge_panel: None,
        }
    }
}

fn is_question(query: &str) -> bool {
    let query = query.to_lowercase();
    QUESTION_INDICATORS.iter().any(|q| query.contains(q))
}

pub(crate) fn answer_from_expanders(expanders: &[ElementRef<'_>], query: &str) -> Option<String> {
    if !is_question(query) {
        return None;
    }
    expanders
        .iter()
        .map(|el| dom::extract_text(*el))
        .find(|text| {
            let len = dom::char_len(text);
            20 < len && len < 300
        })
}

pub(crate) fn calculator_answer(html: &str) -> Option<String> {
    CALCULATOR
        .iter()
        .find_map(|pattern| pattern.capture(html, 1))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn time_date_answer(html: &str, query: &str) -> Option<String> {
    let query = query.to_lowercase();
    if !TIME_KEYWORDS.iter().any(|k| query.contains(k)) {
        return None;
    }
    TIME_DATE
        .iter()
        .find_map(|pattern| pattern.find(html))
        .map(|value| value.trim().to_string())
}

pub(crate) fn weather_answer(root: ElementRef<'_>, query: &str) -> Option<String> {
    if !query.to_lowercase().contains("weather") {
        return None;
    }
    dom::elements_with_class(root, &["span", "div"], &WEATHER_CLASS)
        .into_iter()
        .map(dom::extract_text)
        .find(|text| WEATHER_TEXT.is_match(text))
        .map(|text| {
            let first_line = text.lines().next().unwrap_or_default().trim();
            dom::truncate_chars(first_line, WEATHER_ANSWER_CHARS)
        })
}

pub(crate) fn panel_from_expanders(expanders: &[ElementRef<'_>]) -> Option<KnowledgePanel> {
    for el in expanders {
        let text = dom::extract_text(*el);
        let len = dom::char_len(&text);
        if len <= 20 {
            continue;
        }
        let mut description = dom::truncate_chars(&text, PANEL_DESCRIPTION_CHARS);
        if len > PANEL_DESCRIPTION_CHARS {
            description.push_str("...");
        }
        let title = HEADING.first(*el).map(dom::extract_text).unwrap_or_default();
        // Short untitled blocks are more likely answers than panels.
        if len >= 300 || !title.is_empty() {
            return Some(KnowledgePanel {
                title,
                description,
                facts: BTreeMap::new(),
                source: STARTPAGE_KNOWLEDGE_SOURCE.to_string(),
            });
        }
    }
    None
}

pub(crate) fn generic_panel(root: ElementRef<'_>) -> Option<KnowledgePanel> {
    let containers = dom::elements_with_class(root, &["div", "section", "aside"], &PANEL_CLASS);
    for container in containers {
        let full_text = dom::extract_text(container);
        let len = dom::char_len(&full_text);
        if !(200 < len && len < 5000) {
            continue;
        }

        let title_el = ROLE_HEADING
            .first(container)
            .or_else(|| HEADING.first(container));
        let paragraphs = PARAGRAPH.all(container);
        let description_el = paragraphs
            .iter()
            .copied()
            .find(|p| dom::char_len(&dom::extract_text(*p)) > 50)
            .or_else(|| paragraphs.first().copied());
        if title_el.is_none() && description_el.is_none() {
            continue;
        }

        let title = title_el.map(dom::extract_text).unwrap_or_default();
        let description = match description_el {
            Some(p) => dom::truncate_chars(&dom::extract_text(p), PANEL_DESCRIPTION_CHARS),
            None => {
                let rest = full_text.replace(title.as_str(), "");
                dom::truncate_chars(rest.trim(), PANEL_DESCRIPTION_CHARS)
            }
        };

        if title.is_empty() && dom::char_len(&description) <= 100 {
            continue;
        }

        return Some(KnowledgePanel {
            title,
            description,
            facts: extract_facts(container),
            source: KNOWLEDGE_PANEL_SOURCE.to_string(),
        });
    }
    None
}

/// `dt`/`th` labels paired with the next `dd`/`td` sibling.
fn extract_facts(container: ElementRef<'_>) -> BTreeMap<String, String> {
    let mut facts = BTreeMap::new();
    for label in FACT_NAME.all(container) {
        let name = dom::extract_text(label);
        let name = name.trim_end_matches(':').trim();
        let Some(value_el) = label
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|s| matches!(s.value().name(), "dd" | "td"))
        else {
            continue;
        };
        let value = dom::extract_text(value_el);
        if !name.is_empty()
            && !value.is_empty()
            && dom::char_len(name) < 50
            && dom::char_len(&value) < 200
        {
            facts.insert(name.to_string(), value);
        }
    }
    facts
}

//! Small helpers shared by the result extractors.
//!
//! Selectors and regexes are compiled once. A pattern that fails to compile is
//! logged and then simply never matches, which the fallback cascades already
//! know how to live with.

use regex::{Captures, Regex};
use scraper::{ElementRef, Node, Selector};

use crate::endpoints::BASE_URL;

pub(crate) struct Css {
    source: &'static str,
    selector: Option<Selector>,
}

impl Css {
    pub(crate) fn new(source: &'static str) -> Self {
        let selector = match Selector::parse(source) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!("invalid selector {source:?}: {e:?}");
                None
            }
        };
        Self { source, selector }
    }

    pub(crate) fn list(sources: &[&'static str]) -> Vec<Css> {
        sources.iter().copied().map(Css::new).collect()
    }

    pub(crate) fn source(&self) -> &'static str {
        self.source
    }

    pub(crate) fn all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match &self.selector {
            Some(selector) => scope.select(selector).collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selector
            .as_ref()
            .and_then(|selector| scope.select(selector).next())
    }
}

pub(crate) struct Pattern(Option<Regex>);

impl Pattern {
    pub(crate) fn new(pattern: &str) -> Self {
        match Regex::new(pattern) {
            Ok(re) => Pattern(Some(re)),
            Err(e) => {
                tracing::warn!("invalid pattern {pattern:?}: {e}");
                Pattern(None)
            }
        }
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.0.as_ref().is_some_and(|re| re.is_match(text))
    }

    pub(crate) fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.0
            .as_ref()
            .and_then(|re| re.find(text))
            .map(|m| m.as_str())
    }

    pub(crate) fn find_iter<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.0
            .iter()
            .flat_map(move |re| re.find_iter(text).map(|m| m.as_str()))
    }

    pub(crate) fn captures<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.0.as_ref().and_then(|re| re.captures(text))
    }

    /// Text of capture group `group` of the first match.
    pub(crate) fn capture<'t>(&self, text: &'t str, group: usize) -> Option<&'t str> {
        self.captures(text)
            .and_then(|caps| caps.get(group))
            .map(|m| m.as_str())
    }
}

/// Rank-and-stop: the matches of the first strategy that finds anything.
pub(crate) fn first_hit<'a>(strategies: &[Css], scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    for strategy in strategies {
        let found = strategy.all(scope);
        if !found.is_empty() {
            tracing::debug!("container strategy {:?} matched {}", strategy.source(), found.len());
            return found;
        }
    }
    Vec::new()
}

/// Elements under `scope` (itself included) with one of the given tag names
/// whose `class` attribute matches `pattern`. An empty tag list accepts any tag.
pub(crate) fn elements_with_class<'a>(
    scope: ElementRef<'a>,
    tags: &[&str],
    pattern: &Pattern,
) -> Vec<ElementRef<'a>> {
    elements_where(scope, tags, |el| {
        el.value()
            .attr("class")
            .is_some_and(|class| pattern.is_match(class))
    })
}

pub(crate) fn elements_with_id<'a>(
    scope: ElementRef<'a>,
    tags: &[&str],
    pattern: &Pattern,
) -> Vec<ElementRef<'a>> {
    elements_where(scope, tags, |el| {
        el.value().attr("id").is_some_and(|id| pattern.is_match(id))
    })
}

pub(crate) fn elements_where<'a, F>(scope: ElementRef<'a>, tags: &[&str], keep: F) -> Vec<ElementRef<'a>>
where
    F: Fn(&ElementRef<'a>) -> bool,
{
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| tags.is_empty() || tags.contains(&el.value().name()))
        .filter(|el| keep(el))
        .collect()
}

/// Nearest enclosing `<a href>`.
pub(crate) fn closest_link<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "a" && a.value().attr("href").is_some())
}

/// `href` of the element itself if it is a link, else of the enclosing link.
pub(crate) fn link_href<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    if el.value().name() == "a" {
        if let Some(href) = el.value().attr("href") {
            return Some(href);
        }
    }
    closest_link(el).and_then(|a| a.value().attr("href"))
}

pub(crate) fn has_ancestor_class(el: ElementRef<'_>, pattern: &Pattern) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().attr("class").is_some_and(|c| pattern.is_match(c)))
}

/// First non-empty attribute among `names`.
pub(crate) fn attr_any<'a>(el: ElementRef<'a>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| el.value().attr(name))
        .map(str::trim)
        .find(|v| !v.is_empty())
}

pub(crate) fn is_disabled(el: ElementRef<'_>) -> bool {
    let value = el.value();
    value.attr("disabled").is_some()
        || value.attr("aria-disabled") == Some("true")
        || value.classes().any(|c| c.eq_ignore_ascii_case("disabled"))
}

/// Visible text of an element: text nodes joined by single spaces, with
/// whitespace (non-breaking spaces included) collapsed. Script and style
/// bodies are skipped.
pub fn extract_text(el: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in el.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| matches!(a.value().name(), "script" | "style"));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

/// Makes links absolute: `//host/x` gets `https:`, `/x` is joined to the
/// Startpage origin, anything else passes through trimmed.
pub fn normalize_url(url: &str) -> String {
    normalize_url_with_base(url, BASE_URL)
}

pub fn normalize_url_with_base(url: &str, base_url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("//") {
        return format!("https:{url}");
    }
    if url.starts_with('/') {
        return format!("{}{}", base_url.trim_end_matches('/'), url);
    }
    url.to_string()
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

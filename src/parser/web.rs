use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};

use super::dom::{self, Css, Pattern};
use crate::data_models::WebResult;

static CONTAINERS: Lazy<Vec<Css>> = Lazy::new(|| {
    Css::list(&[
        "div.w-gl-result",
        "div.result",
        "article.result-item",
        "div[data-testid='result-item']",
        "div[class*='search-result-item']",
        "section.web-result",
    ])
});
static HEADING_LINK: Lazy<Css> = Lazy::new(|| Css::new("h2 > a[href], h3 > a[href], h4 > a[href]"));
static SNIPPET_LIKE: Lazy<Css> =
    Lazy::new(|| Css::new("p, span[class*='snippet'], span[class*='desc']"));
static TITLES: Lazy<Vec<Css>> = Lazy::new(|| {
    Css::list(&[
        "h2 > a, h3 > a, h4 > a, a > h2, a > h3, a > h4",
        "a[href][role='heading'], a[href][data-testid='result-title-a']",
    ])
});
static ANY_LINK: Lazy<Css> = Lazy::new(|| Css::new("a[href]"));
static DESCRIPTION: Lazy<Css> = Lazy::new(|| {
    Css::new(
        "p[class*='snippet'], p[class*='desc'], div[class*='snippet'], div[class*='desc'], .result-snippet",
    )
});
static PARAGRAPH: Lazy<Css> = Lazy::new(|| Css::new("p"));
static DISPLAY_URL: Lazy<Css> =
    Lazy::new(|| Css::new("cite, span[class*='url'], div[class*='breadcrumb'], .result__url"));
static AD_BLOCK: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)ads|related"));
static HOST: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"^https?://([^/]+)"));

pub fn extract(document: &Html) -> Vec<WebResult> {
    let root = document.root_element();
    let mut containers = dom::first_hit(&CONTAINERS, root);
    if containers.is_empty() {
        containers = heuristic_containers(root);
        tracing::debug!("no known web result markup, {} heuristic containers", containers.len());
    }
    containers.into_iter().filter_map(parse_container).collect()
}

/// Innermost `div`s holding both a heading link and something snippet-like.
fn heuristic_containers(root: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let candidates = dom::elements_where(root, &["div"], |div| {
        HEADING_LINK.first(*div).is_some() && SNIPPET_LIKE.first(*div).is_some()
    });
    let ids: HashSet<_> = candidates.iter().map(|c| c.id()).collect();
    candidates
        .into_iter()
        .filter(|c| !c.descendants().skip(1).any(|n| ids.contains(&n.id())))
        .collect()
}

fn find_title(container: ElementRef<'_>) -> Option<ElementRef<'_>> {
    TITLES
        .iter()
        .find_map(|css| css.first(container))
        .or_else(|| {
            ANY_LINK
                .all(container)
                .into_iter()
                .find(|a| !dom::extract_text(*a).is_empty())
        })
}

fn parse_container(container: ElementRef<'_>) -> Option<WebResult> {
    let title_el = find_title(container)?;
    let title = dom::extract_text(title_el);
    let url = dom::normalize_url(dom::link_href(title_el).unwrap_or_default());
    if title.is_empty() || url.is_empty() {
        tracing::debug!("dropping web result without title or url");
        return None;
    }

    let description = DESCRIPTION
        .first(container)
        .or_else(|| {
            PARAGRAPH
                .all(container)
                .into_iter()
                .find(|p| !dom::has_ancestor_class(*p, &AD_BLOCK))
        })
        .map(dom::extract_text)
        .unwrap_or_default();

    let display_url = DISPLAY_URL
        .first(container)
        .map(dom::extract_text)
        .and_then(|text| text.split(' ').next().map(str::to_string))
        .filter(|text| !text.is_empty())
        .or_else(|| HOST.capture(&url, 1).map(str::to_string))
        .unwrap_or_default();

    Some(WebResult {
        title,
        url,
        description,
        display_url,
    })
}

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};

use super::dom::{self, Css, Pattern};
use crate::data_models::NewsResult;

static CONTAINERS: Lazy<Vec<Css>> = Lazy::new(|| {
    Css::list(&[
        "article.news-item",
        "div.news-result",
        "div[class*='story-card']",
        "div.search-result-news",
    ])
});
static NEWS_CLASS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)news|story|article"));
static TITLE_LINK: Lazy<Css> =
    Lazy::new(|| Css::new("h3 a, h4 a, .title a, .headline a, a .title"));
static HEADING: Lazy<Css> = Lazy::new(|| Css::new("h3, h4, .title, .headline"));
static ANY_LINK: Lazy<Css> = Lazy::new(|| Css::new("a[href]"));
static DESCRIPTION: Lazy<Css> =
    Lazy::new(|| Css::new(".snippet, .description, .summary, .article-summary"));
static SOURCE: Lazy<Css> =
    Lazy::new(|| Css::new(".source, .publisher, .attribution cite, .article-source"));
static DATE: Lazy<Css> = Lazy::new(|| Css::new(".date, .timestamp, time, .article-date"));

pub fn extract(document: &Html) -> Vec<NewsResult> {
    let root = document.root_element();
    let mut containers = dom::first_hit(&CONTAINERS, root);
    if containers.is_empty() {
        containers = dom::elements_with_class(root, &["article"], &NEWS_CLASS);
    }
    containers.into_iter().filter_map(parse_container).collect()
}

/// Headline text and its link. The headline may be the link, sit inside it,
/// or stand alone next to the article's first link.
fn find_headline(container: ElementRef<'_>) -> Option<(String, String)> {
    if let Some(link) = TITLE_LINK.first(container) {
        let href = dom::link_href(link)?;
        return Some((dom::extract_text(link), dom::normalize_url(href)));
    }
    let heading = HEADING.first(container)?;
    let link = dom::closest_link(heading).or_else(|| ANY_LINK.first(container))?;
    let href = link.value().attr("href")?;
    Some((dom::extract_text(heading), dom::normalize_url(href)))
}

fn parse_container(container: ElementRef<'_>) -> Option<NewsResult> {
    let (title, url) = find_headline(container)?;
    if title.is_empty() || url.is_empty() {
        tracing::debug!("dropping news result without title or url");
        return None;
    }

    let description = DESCRIPTION
        .first(container)
        .map(dom::extract_text)
        .unwrap_or_default();
    let source = SOURCE
        .first(container)
        .map(dom::extract_text)
        .unwrap_or_default();
    let published_date = DATE
        .first(container)
        .map(|date| match dom::attr_any(date, &["datetime"]) {
            Some(stamp) => stamp.to_string(),
            None => dom::extract_text(date),
        })
        .unwrap_or_default();

    Some(NewsResult {
        title,
        url,
        description,
        source,
        published_date,
    })
}

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};

use super::dom::{self, Css, Pattern};
use crate::data_models::VideoResult;

static CONTAINERS: Lazy<Vec<Css>> = Lazy::new(|| {
    Css::list(&[
        "div.video-result-item",
        "article.video-object",
        "div[class*='vid-item']",
        "div.search-result-video",
    ])
});
static VIDEO_RESULT_CLASS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)result.*video"));
static TITLE: Lazy<Css> = Lazy::new(|| Css::new("h3 a, h4 a, .video-title a, .title a"));
static DESCRIPTION: Lazy<Css> =
    Lazy::new(|| Css::new(".video-description, .snippet, .desc, .description"));
static DURATION: Lazy<Css> =
    Lazy::new(|| Css::new(".video-duration, .time, .duration, span[class*='duration']"));
static CLOCK: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(\d{1,2}:\d{2}(?::\d{2})?)"));

pub fn extract(document: &Html) -> Vec<VideoResult> {
    let root = document.root_element();
    let mut containers = dom::first_hit(&CONTAINERS, root);
    if containers.is_empty() {
        containers = dom::elements_with_class(root, &["div"], &VIDEO_RESULT_CLASS);
    }
    containers.into_iter().filter_map(parse_container).collect()
}

fn parse_container(container: ElementRef<'_>) -> Option<VideoResult> {
    let title_el = TITLE.first(container)?;
    let title = dom::extract_text(title_el);
    let url = dom::normalize_url(title_el.value().attr("href").unwrap_or_default());
    if title.is_empty() || url.is_empty() {
        tracing::debug!("dropping video result without title or url");
        return None;
    }

    let description = DESCRIPTION
        .first(container)
        .map(dom::extract_text)
        .unwrap_or_default();

    // "Duration 4:13" becomes "4:13"; text without a clock reading is kept as is.
    let duration = DURATION
        .first(container)
        .map(dom::extract_text)
        .map(|text| {
            let clock = CLOCK.capture(&text, 1).map(str::to_string);
            clock.unwrap_or(text)
        })
        .unwrap_or_default();

    Some(VideoResult {
        title,
        url,
        description,
        duration,
    })
}

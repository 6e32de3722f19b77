//! Turns Startpage result pages into records.
//!
//! Every category walks an ordered list of container selectors, most specific
//! first, and stops at the first one that matches anything. Fields inside a
//! container have their own fallbacks. A container missing its required
//! fields is dropped; the rest of the page is still returned.

mod dom;
pub mod images;
pub mod instant;
mod json;
pub mod news;
pub mod pagination;
pub mod places;
pub mod suggestions;
pub mod videos;
pub mod web;

use scraper::Html;

use crate::data_models::{Category, ResultPage, ResultRecord};
use crate::error::{Result, StartpageError};

pub use dom::{extract_text, normalize_url, normalize_url_with_base};
pub use instant::{extract_instant_answers, resolve_duplicates};
pub use pagination::{extract_total_results, has_next_page};
pub use suggestions::{MAX_SUGGESTIONS, parse_suggestions};

/// Parses a results page for a category given by name: `web`, `images`,
/// `videos`, `news` or `places`. Upstream codes such as `pics` are rejected.
pub fn parse_search_results(html: &str, category: &str) -> Result<ResultPage> {
    if html.trim().is_empty() {
        return Err(StartpageError::Parse(
            "cannot parse empty HTML content".to_string(),
        ));
    }
    let category = Category::ALL
        .into_iter()
        .find(|c| c.as_str() == category)
        .ok_or_else(|| {
            StartpageError::Parse(format!("unknown search type for parsing: {category}"))
        })?;
    parse_category(html, category)
}

pub fn parse_category(html: &str, category: Category) -> Result<ResultPage> {
    if html.trim().is_empty() {
        return Err(StartpageError::Parse(
            "cannot parse empty HTML content".to_string(),
        ));
    }

    let document = Html::parse_document(html);
    let results: Vec<ResultRecord> = match category {
        Category::Web => web::extract(&document)
            .into_iter()
            .map(ResultRecord::Web)
            .collect(),
        Category::Images => images::extract(&document)
            .into_iter()
            .map(ResultRecord::Image)
            .collect(),
        Category::Videos => videos::extract(&document)
            .into_iter()
            .map(ResultRecord::Video)
            .collect(),
        Category::News => news::extract(&document)
            .into_iter()
            .map(ResultRecord::News)
            .collect(),
        Category::Places => places::extract(&document)
            .into_iter()
            .map(ResultRecord::Place)
            .collect(),
    };
    tracing::debug!("parsed {} {} results", results.len(), category);

    Ok(ResultPage {
        results,
        total_results: extract_total_results(&document),
        has_next_page: has_next_page(&document),
    })
}

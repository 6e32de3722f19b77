use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};
use serde_json::Value;

use super::dom::{self, Css, Pattern};
use super::json;
use crate::data_models::ImageResult;

const DEFAULT_TITLE: &str = "Image";

static SCRIPT: Lazy<Css> = Lazy::new(|| Css::new("script"));
// A flat JSON object carrying an image-URL-shaped key.
static IMAGE_OBJECT: Lazy<Pattern> = Lazy::new(|| {
    Pattern::new(r#"(?i)\{[^{}]*?"(?:image.?url|thumbnail.?url|content.?url)":.*?\}"#)
});
static TILES: Lazy<Vec<Css>> = Lazy::new(|| {
    Css::list(&[
        "div.image-result-item",
        "div.tile",
        "figure.image-container",
        "div.img-result",
    ])
});
static MAIN_CONTENT: Lazy<Vec<Css>> = Lazy::new(|| Css::list(&["main", "div#main_results"]));
static IMAGE_CLASS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)image|img|pic"));
static IMG: Lazy<Css> = Lazy::new(|| Css::new("img"));
static FIGCAPTION: Lazy<Css> = Lazy::new(|| Css::new("figcaption"));
static CAPTION_CLASS: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"(?i)title|caption"));
static ANY_LINK: Lazy<Css> = Lazy::new(|| Css::new("a[href]"));

pub fn extract(document: &Html) -> Vec<ImageResult> {
    let root = document.root_element();
    let mut seen = HashSet::new();

    let results = from_scripts(root, &mut seen);
    if !results.is_empty() {
        return results;
    }
    tracing::debug!("no embedded image data, falling back to <img> tiles");
    from_tiles(root, &mut seen)
}

fn from_scripts(root: ElementRef<'_>, seen: &mut HashSet<String>) -> Vec<ImageResult> {
    let mut results = Vec::new();
    for script in SCRIPT.all(root) {
        let body: String = script.text().collect();
        for fragment in IMAGE_OBJECT.find_iter(&body) {
            let Ok(Value::Object(data)) = serde_json::from_str::<Value>(fragment) else {
                continue;
            };
            let image_url = dom::normalize_url(
                json::first_str(&data, &["thumbnailUrl", "contentUrl", "url", "imageUrl"])
                    .unwrap_or_default(),
            );
            if image_url.is_empty() || seen.contains(&image_url) {
                continue;
            }
            let source_url = dom::normalize_url(
                json::first_str(&data, &["hostPageUrl", "source", "page"]).unwrap_or_default(),
            );
            let title = ["name", "title", "alt"]
                .iter()
                .filter_map(|key| data.get(*key).and_then(json::scalar_to_string))
                .find(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string());

            seen.insert(image_url.clone());
            results.push(ImageResult {
                image_url,
                source_url,
                title,
            });
        }
    }
    results
}

fn from_tiles(root: ElementRef<'_>, seen: &mut HashSet<String>) -> Vec<ImageResult> {
    let mut tiles = dom::first_hit(&TILES, root);
    if tiles.is_empty() {
        let scope = dom::first_hit(&MAIN_CONTENT, root)
            .into_iter()
            .next()
            .unwrap_or(root);
        tiles = dom::elements_with_class(scope, &["div"], &IMAGE_CLASS);
    }

    let mut results = Vec::new();
    for tile in tiles {
        let Some(img) = IMG.first(tile) else {
            continue;
        };
        let image_url = dom::normalize_url(dom::attr_any(img, &["data-src", "src"]).unwrap_or_default());
        if image_url.is_empty() || seen.contains(&image_url) {
            continue;
        }

        let title = dom::attr_any(img, &["alt", "title"])
            .map(str::to_string)
            .or_else(|| {
                FIGCAPTION
                    .first(tile)
                    .or_else(|| {
                        dom::elements_with_class(tile, &["p", "span"], &CAPTION_CLASS)
                            .into_iter()
                            .next()
                    })
                    .map(dom::extract_text)
                    .filter(|t| !t.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let source_url = dom::closest_link(img)
            .or_else(|| ANY_LINK.first(tile))
            .and_then(|a| a.value().attr("href"))
            .map(dom::normalize_url)
            .unwrap_or_default();

        seen.insert(image_url.clone());
        results.push(ImageResult {
            image_url,
            source_url,
            title,
        });
    }
    results
}

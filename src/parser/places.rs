use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html};
use serde_json::{Map, Value};

use super::dom::{self, Css, Pattern};
use super::json;
use crate::data_models::{PlaceDataSource, PlaceResult};

const PLACE_TYPES: &[&str] = &[
    "Place",
    "LocalBusiness",
    "Restaurant",
    "Store",
    "Hotel",
    "PostalAddress",
];
const ADDRESS_PARTS: &[&str] = &[
    "streetAddress",
    "postOfficeBoxNumber",
    "addressLocality",
    "addressRegion",
    "postalCode",
    "addressCountry",
];

static LINKED_DATA: Lazy<Css> = Lazy::new(|| Css::new("script[type='application/ld+json']"));
static CARDS: Lazy<Vec<Css>> = Lazy::new(|| {
    Css::list(&[
        "div.place-card",
        "article.local-result",
        "div[data-result-type='local']",
        "div[class*='place-result']",
        "div[class*='location-card']",
    ])
});
static PLACE_RESULT_CLASS: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"(?i)result.*(place|local|map|location)"));
static NAME: Lazy<Css> =
    Lazy::new(|| Css::new("h3, h4, .place-name, .title, [role='heading']"));
static ADDRESS: Lazy<Css> =
    Lazy::new(|| Css::new(".address, .adr, .place-address, [itemprop='address']"));
static PHONE: Lazy<Css> =
    Lazy::new(|| Css::new(".phone, .tel, .place-phone, [itemprop='telephone']"));
static WEBSITE: Lazy<Css> = Lazy::new(|| {
    Css::new(
        "a.website-link, a[href*='maps.google.com'], a[itemprop='url'], a.directions-link",
    )
});
static ANY_LINK: Lazy<Css> = Lazy::new(|| Css::new("a[href]"));
static RATING: Lazy<Css> = Lazy::new(|| {
    Css::new(".rating, .review-score, [aria-label*='star rating'], [itemprop='ratingValue']")
});
static RATING_NUMBER: Lazy<Pattern> = Lazy::new(|| Pattern::new(r"([0-9.]+)"));

pub fn extract(document: &Html) -> Vec<PlaceResult> {
    let root = document.root_element();
    // Places are keyed by lowercase "name|address".
    let mut seen = HashSet::new();

    let results = from_linked_data(root, &mut seen);
    if !results.is_empty() {
        return results;
    }
    tracing::debug!("no linked-data places, falling back to cards");
    from_cards(root, &mut seen)
}

fn place_key(name: &str, address: &str) -> String {
    format!("{name}|{address}").to_lowercase()
}

/// Unwraps the list shapes linked data comes in: a bare array, an `ItemList`
/// or a `@graph`.
fn candidate_items(data: &Value) -> Vec<&Value> {
    match data {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => {
            if obj.get("@type").and_then(Value::as_str) == Some("ItemList") {
                obj.get("itemListElement")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().collect())
                    .unwrap_or_default()
            } else if let Some(graph) = obj.get("@graph").and_then(Value::as_array) {
                graph.iter().collect()
            } else {
                vec![data]
            }
        }
        _ => Vec::new(),
    }
}

fn item_type(item: &Map<String, Value>) -> &str {
    match item.get("@type") {
        Some(Value::String(t)) => t.as_str(),
        Some(Value::Array(types)) => types.first().and_then(Value::as_str).unwrap_or_default(),
        _ => "",
    }
}

fn address_text(item: &Map<String, Value>) -> String {
    match item.get("address") {
        Some(Value::String(address)) => address.trim().to_string(),
        Some(Value::Object(parts)) => ADDRESS_PARTS
            .iter()
            .filter_map(|key| parts.get(*key).and_then(json::scalar_to_string))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn from_linked_data(root: ElementRef<'_>, seen: &mut HashSet<String>) -> Vec<PlaceResult> {
    let mut results = Vec::new();
    for script in LINKED_DATA.all(root) {
        let body: String = script.text().collect();
        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("skipping unreadable ld+json block: {e}");
                continue;
            }
        };

        for entry in candidate_items(&data) {
            // ItemList entries wrap the place in "item".
            let entry = entry.get("item").filter(|v| v.is_object()).unwrap_or(entry);
            let Some(item) = entry.as_object() else {
                continue;
            };
            let kind = item_type(item);
            if !PLACE_TYPES.contains(&kind) {
                continue;
            }

            let mut name = json::first_str(item, &["name"]).unwrap_or_default().to_string();
            if name.is_empty() && kind == "PostalAddress" {
                name = "Address".to_string();
            }
            if name.is_empty() {
                continue;
            }

            let address = address_text(item);
            let key = place_key(&name, &address);
            if seen.contains(&key) {
                continue;
            }

            let rating = item.get("aggregateRating").and_then(Value::as_object);
            let geo = item.get("geo").and_then(Value::as_object);
            let field = |obj: Option<&Map<String, Value>>, key: &str| {
                obj.and_then(|o| o.get(key)).and_then(json::scalar_to_string)
            };

            seen.insert(key);
            results.push(PlaceResult {
                name,
                address,
                phone: json::first_str(item, &["telephone"])
                    .unwrap_or_default()
                    .to_string(),
                url: dom::normalize_url(
                    json::first_str(item, &["url", "mainEntityOfPage"]).unwrap_or_default(),
                ),
                rating: field(rating, "ratingValue"),
                review_count: rating
                    .and_then(|r| r.get("reviewCount"))
                    .and_then(json::scalar_to_u64),
                latitude: field(geo, "latitude"),
                longitude: field(geo, "longitude"),
                data_source: PlaceDataSource::LdJson,
            });
        }
    }
    results
}

fn from_cards(root: ElementRef<'_>, seen: &mut HashSet<String>) -> Vec<PlaceResult> {
    let mut cards = dom::first_hit(&CARDS, root);
    if cards.is_empty() {
        cards = dom::elements_with_class(root, &["div"], &PLACE_RESULT_CLASS);
    }

    let mut results = Vec::new();
    for card in cards {
        let name_el = NAME.first(card);
        let name = name_el.map(dom::extract_text).unwrap_or_default();
        if name.is_empty() {
            continue;
        }
        let address = ADDRESS
            .first(card)
            .map(dom::extract_text)
            .unwrap_or_default();
        let key = place_key(&name, &address);
        if seen.contains(&key) {
            continue;
        }

        let phone = PHONE.first(card).map(dom::extract_text).unwrap_or_default();
        let url = WEBSITE
            .first(card)
            .or_else(|| name_el.and_then(dom::closest_link))
            .or_else(|| ANY_LINK.first(card))
            .and_then(|a| a.value().attr("href"))
            .map(dom::normalize_url)
            .unwrap_or_default();
        let rating = RATING
            .first(card)
            .map(|el| match dom::attr_any(el, &["content"]) {
                Some(content) => content.to_string(),
                None => dom::extract_text(el),
            })
            .map(|text| {
                let number = RATING_NUMBER.capture(&text, 1).map(str::to_string);
                number.unwrap_or(text)
            })
            .filter(|r| !r.is_empty());

        seen.insert(key);
        results.push(PlaceResult {
            name,
            address,
            phone,
            url,
            rating,
            review_count: None,
            latitude: None,
            longitude: None,
            data_source: PlaceDataSource::Html,
        });
    }
    results
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StartpageError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Web,
    Images,
    Videos,
    News,
    Places,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Web,
        Category::Images,
        Category::Videos,
        Category::News,
        Category::Places,
    ];

    /// Name used by the result parsers and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Web => "web",
            Category::Images => "images",
            Category::Videos => "videos",
            Category::News => "news",
            Category::Places => "places",
        }
    }

    /// Value Startpage expects in the `cat` parameter.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Category::Web => "web",
            Category::Images => "pics",
            Category::Videos => "video",
            Category::News => "news",
            Category::Places => "map",
        }
    }

    pub fn default_page_size(&self) -> u32 {
        match self {
            Category::Images => 20,
            _ => 10,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StartpageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s || c.wire_code() == s)
            .ok_or_else(|| StartpageError::Parse(format!("unknown search category: {s}")))
    }
}

/// Named, defaulted options shared by every search operation. Options that
/// don't apply to a category are ignored when the request is built.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub language: String,
    pub region: String,
    pub safe_search: Option<String>,
    pub time_filter: Option<String>,
    pub size: Option<String>,
    pub duration: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters.
    pub radius: Option<u32>,
    pub page: u32,
    /// `None` picks the category default.
    pub results_per_page: Option<u32>,
    /// Raw upstream parameters, merged last so they can override anything.
    pub extra: Vec<(String, String)>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: "all".to_string(),
            safe_search: Some("moderate".to_string()),
            time_filter: None,
            size: None,
            duration: None,
            latitude: None,
            longitude: None,
            radius: None,
            page: 1,
            results_per_page: None,
            extra: Vec::new(),
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn safe_search(mut self, level: impl Into<String>) -> Self {
        self.safe_search = Some(level.into());
        self
    }

    pub fn time_filter(mut self, filter: impl Into<String>) -> Self {
        self.time_filter = Some(filter.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn radius(mut self, meters: u32) -> Self {
        self.radius = Some(meters);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn results_per_page(mut self, count: u32) -> Self {
        self.results_per_page = Some(count);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub description: String,
    pub display_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ImageResult {
    pub image_url: String,
    pub source_url: String,
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VideoResult {
    pub title: String,
    pub url: String,
    pub description: String,
    pub duration: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewsResult {
    pub title: String,
    pub url: String,
    pub description: String,
    pub source: String,
    pub published_date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceDataSource {
    #[serde(rename = "ld+json")]
    LdJson,
    #[serde(rename = "html")]
    Html,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub url: String,
    pub rating: Option<String>,
    pub review_count: Option<u64>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub data_source: PlaceDataSource,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResultRecord {
    Web(WebResult),
    Image(ImageResult),
    Video(VideoResult),
    News(NewsResult),
    Place(PlaceResult),
}

impl ResultRecord {
    /// Title of the record; places report their name.
    pub fn title(&self) -> &str {
        match self {
            ResultRecord::Web(r) => &r.title,
            ResultRecord::Image(r) => &r.title,
            ResultRecord::Video(r) => &r.title,
            ResultRecord::News(r) => &r.title,
            ResultRecord::Place(r) => &r.name,
        }
    }

    /// Primary link of the record. For images this is the image itself.
    pub fn url(&self) -> &str {
        match self {
            ResultRecord::Web(r) => &r.url,
            ResultRecord::Image(r) => &r.image_url,
            ResultRecord::Video(r) => &r.url,
            ResultRecord::News(r) => &r.url,
            ResultRecord::Place(r) => &r.url,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub results: Vec<ResultRecord>,
    /// Best-effort estimate, 0 when the page doesn't say.
    pub total_results: u64,
    pub has_next_page: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct KnowledgePanel {
    pub title: String,
    pub description: String,
    pub facts: BTreeMap<String, String>,
    pub source: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct InstantAnswerBundle {
    pub instant_answer: Option<String>,
    pub knowledge_panel: Option<KnowledgePanel>,
}

impl InstantAnswerBundle {
    pub fn is_empty(&self) -> bool {
        self.instant_answer.is_none() && self.knowledge_panel.is_none()
    }
}

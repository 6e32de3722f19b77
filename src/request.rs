use crate::data_models::{Category, SearchOptions};
use crate::endpoints;
use crate::error::{Result, StartpageError};

/// Ordered upstream parameters. Setting a key that is already present
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    pairs: Vec<(String, String)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in pairs {
            self.set(k, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

/// One logical search, built per call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub category: Category,
    pub options: SearchOptions,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, category: Category, options: SearchOptions) -> Self {
        Self {
            query: query.into(),
            category,
            options,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.options
            .results_per_page
            .unwrap_or_else(|| self.category.default_page_size())
    }

    /// Pagination offset; Startpage counts results from zero.
    pub fn offset(&self) -> u64 {
        u64::from(self.options.page.saturating_sub(1)) * u64::from(self.page_size())
    }

    pub fn build(&self) -> Result<ParameterSet> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(StartpageError::InvalidRequest(
                "query cannot be empty".to_string(),
            ));
        }

        let opts = &self.options;
        let category = self.category;
        let language = endpoints::language_code(&opts.language);

        let mut params = ParameterSet::new();
        params.set("query", query);
        params.set("cat", category.wire_code());
        params.set("cmd", endpoints::SEARCH_COMMAND);
        params.set("language", language);
        params.set("lui", language);
        params.set("pl", endpoints::region_code(&opts.region));
        params.set("startat", self.offset().to_string());

        if let Some(level) = opts.safe_search.as_deref() {
            if !matches!(category, Category::News | Category::Places) {
                params.set("ff", endpoints::safe_search_level(level));
            }
        }

        if category == Category::Web {
            params.set("num", self.page_size().to_string());
        }

        if let Some(filter) = active(&opts.time_filter) {
            if matches!(category, Category::Web | Category::Videos | Category::News) {
                params.set("with_date", endpoints::time_filter(filter));
            }
        }

        if let Some(size) = active(&opts.size) {
            if category == Category::Images {
                params.set("size", endpoints::image_size(size));
            }
        }

        if let Some(duration) = active(&opts.duration) {
            if category == Category::Videos {
                params.set("duration", endpoints::video_duration(duration));
            }
        }

        if category == Category::Places {
            if let (Some(lat), Some(lon)) = (opts.latitude, opts.longitude) {
                params.set("latitude", lat.to_string());
                params.set("longitude", lon.to_string());
            }
            if let Some(radius) = opts.radius {
                params.set("radius", radius.to_string());
            }
        }

        params.extend(opts.extra.iter().cloned());
        Ok(params)
    }
}

// A filter set to "any" (or left empty) means no filter at all.
fn active(filter: &Option<String>) -> Option<&str> {
    filter
        .as_deref()
        .filter(|f| !f.is_empty() && *f != "any")
}

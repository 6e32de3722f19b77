use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use nanoid::nanoid;
use reqwest::Url;

use crate::config::{CONFIG, ClientConfig};
use crate::data_models::{Category, InstantAnswerBundle, ResultPage, SearchOptions};
use crate::endpoints;
use crate::error::{Result, StartpageError};
use crate::parser;
use crate::request::{ParameterSet, SearchRequest};
use crate::transport::{HttpBackend, ReqwestBackend, Transport};

const LEADING_DIGITS: [char; 9] = ['1', '2', '3', '4', '5', '6', '7', '8', '9'];
const SESSION_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Blocking Startpage client. Each call builds the request, sends it through
/// the throttled transport and parses the page; nothing is cached between
/// calls.
pub struct StartpageClient {
    config: ClientConfig,
    transport: Transport,
    session_id: String,
}

impl StartpageClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Client over the process-wide configuration read from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(CONFIG.clone())
    }

    /// Uses a caller-provided HTTP backend, e.g. a scripted one in tests.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn HttpBackend>) -> Self {
        let transport = Transport::new(backend, config.delay);
        Self {
            config,
            transport,
            session_id: generate_session_id(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn delay(&self) -> Duration {
        self.transport.throttle().delay()
    }

    /// When the last request left the throttle, if any has.
    pub fn last_request(&self) -> Option<Instant> {
        self.transport.throttle().last_request()
    }

    /// Cosmetic identifier of this client, `sp_<unix seconds>_<4 digits>`.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<ResultPage> {
        self.perform_search(query, Category::Web, options)
    }

    pub fn images_search(&self, query: &str, options: &SearchOptions) -> Result<ResultPage> {
        self.perform_search(query, Category::Images, options)
    }

    pub fn videos_search(&self, query: &str, options: &SearchOptions) -> Result<ResultPage> {
        self.perform_search(query, Category::Videos, options)
    }

    /// Safe search doesn't apply to news and is never sent.
    pub fn news_search(&self, query: &str, options: &SearchOptions) -> Result<ResultPage> {
        self.perform_search(query, Category::News, options)
    }

    /// Uses `latitude`/`longitude`/`radius` from the options when set.
    pub fn places_search(&self, query: &str, options: &SearchOptions) -> Result<ResultPage> {
        self.perform_search(query, Category::Places, options)
    }

    pub fn perform_search(
        &self,
        query: &str,
        category: Category,
        options: &SearchOptions,
    ) -> Result<ResultPage> {
        let params = SearchRequest::new(query, category, options.clone()).build()?;
        tracing::debug!("{} search for {:?}, page {}", category, query.trim(), options.page);

        let html = self
            .transport
            .send(&endpoints::search_url(&self.config.base_url), Some(&params), None)?;
        parser::parse_category(&html, category)
    }

    /// Autocomplete for a partial query. A blank query returns nothing
    /// without touching the network.
    pub fn suggestions(&self, query_part: &str, language: &str) -> Result<Vec<String>> {
        let query_part = query_part.trim();
        if query_part.is_empty() {
            return Ok(Vec::new());
        }

        let params = [
            ("q", query_part),
            ("segment", endpoints::SUGGESTIONS_SEGMENT),
            ("format", endpoints::SUGGESTIONS_FORMAT),
            ("lang", endpoints::language_code(language)),
        ];
        let url = Url::parse_with_params(&endpoints::suggestions_url(&self.config.base_url), params)
            .map_err(|e| StartpageError::InvalidRequest(format!("bad suggestions url: {e}")))?;

        let body = self.transport.send(url.as_str(), None, None)?;
        Ok(parser::parse_suggestions(&body))
    }

    /// Fetches a web results page and looks for a direct answer and a
    /// knowledge panel on it. Only `language` and `extra` of the options are
    /// used. A blank query returns an empty bundle without touching the
    /// network.
    pub fn instant_answers(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<InstantAnswerBundle> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(InstantAnswerBundle::default());
        }

        let language = endpoints::language_code(&options.language);
        let mut params = ParameterSet::new();
        params.set("query", query);
        params.set("cat", Category::Web.wire_code());
        params.set("cmd", endpoints::SEARCH_COMMAND);
        params.set("language", language);
        params.set("lui", language);
        params.extend(options.extra.iter().cloned());

        let html = self
            .transport
            .send(&endpoints::search_url(&self.config.base_url), Some(&params), None)?;
        Ok(parser::extract_instant_answers(&html, query))
    }

    /// Web search with readable advanced keys (`ad_block_plus`,
    /// `time_filter`, ...) renamed to their upstream parameters. Unknown keys
    /// are sent as given.
    pub fn advanced_search<K, V>(
        &self,
        query: &str,
        options: &SearchOptions,
        advanced: impl IntoIterator<Item = (K, V)>,
    ) -> Result<ResultPage>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = options.clone();
        options.extra.extend(
            advanced
                .into_iter()
                .map(|(k, v)| (endpoints::advanced_param(k.as_ref()).to_string(), v.into())),
        );
        self.perform_search(query, Category::Web, &options)
    }

    /// The GET form of a search, for diagnostics. Nothing is sent.
    pub fn get_search_url(
        &self,
        query: &str,
        category: Category,
        extra: &[(String, String)],
    ) -> String {
        build_search_url(&self.config.base_url, query, category, extra)
    }
}

pub fn build_search_url(
    base_url: &str,
    query: &str,
    category: Category,
    extra: &[(String, String)],
) -> String {
    let mut params = ParameterSet::new();
    params.set("query", query);
    params.set("cat", category.wire_code());
    params.set("cmd", endpoints::SEARCH_COMMAND);
    params.extend(extra.iter().cloned());

    let search_url = endpoints::search_url(base_url);
    match Url::parse_with_params(&search_url, params.pairs()) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!("cannot build search url from {search_url:?}: {e}");
            search_url
        }
    }
}

fn generate_session_id() -> String {
    // Four digits in 1000..=9999.
    format!(
        "sp_{}_{}{}",
        Utc::now().timestamp(),
        nanoid!(1, &LEADING_DIGITS),
        nanoid!(3, &SESSION_DIGITS)
    )
}

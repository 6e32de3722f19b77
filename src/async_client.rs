use std::sync::Arc;

use tokio::task;

use crate::client::StartpageClient;
use crate::data_models::{Category, InstantAnswerBundle, ResultPage, SearchOptions};
use crate::error::{Result, StartpageError};

/// Non-blocking face of [`StartpageClient`].
///
/// Each call moves its arguments onto tokio's blocking pool and awaits the
/// blocking call there. Dropping the returned future does not cancel a request
/// that is already in flight; it runs to completion and its result is
/// discarded.
#[derive(Clone)]
pub struct AsyncStartpageClient {
    inner: Arc<StartpageClient>,
}

impl AsyncStartpageClient {
    pub fn new(client: StartpageClient) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    pub fn from_shared(client: Arc<StartpageClient>) -> Self {
        Self { inner: client }
    }

    /// The wrapped blocking client.
    pub fn blocking(&self) -> &StartpageClient {
        &self.inner
    }

    async fn run<T, F>(&self, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&StartpageClient) -> Result<T> + Send + 'static,
    {
        let client = Arc::clone(&self.inner);
        task::spawn_blocking(move || call(&client))
            .await
            .map_err(|e| StartpageError::Transport(format!("worker task failed: {e}")))?
    }

    pub async fn search(&self, query: impl Into<String>, options: SearchOptions) -> Result<ResultPage> {
        let query = query.into();
        self.run(move |client| client.search(&query, &options)).await
    }

    pub async fn images_search(
        &self,
        query: impl Into<String>,
        options: SearchOptions,
    ) -> Result<ResultPage> {
        let query = query.into();
        self.run(move |client| client.images_search(&query, &options))
            .await
    }

    pub async fn videos_search(
        &self,
        query: impl Into<String>,
        options: SearchOptions,
    ) -> Result<ResultPage> {
        let query = query.into();
        self.run(move |client| client.videos_search(&query, &options))
            .await
    }

    pub async fn news_search(
        &self,
        query: impl Into<String>,
        options: SearchOptions,
    ) -> Result<ResultPage> {
        let query = query.into();
        self.run(move |client| client.news_search(&query, &options))
            .await
    }

    pub async fn places_search(
        &self,
        query: impl Into<String>,
        options: SearchOptions,
    ) -> Result<ResultPage> {
        let query = query.into();
        self.run(move |client| client.places_search(&query, &options))
            .await
    }

    pub async fn suggestions(
        &self,
        query_part: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Vec<String>> {
        let query_part = query_part.into();
        let language = language.into();
        self.run(move |client| client.suggestions(&query_part, &language))
            .await
    }

    pub async fn instant_answers(
        &self,
        query: impl Into<String>,
        options: SearchOptions,
    ) -> Result<InstantAnswerBundle> {
        let query = query.into();
        self.run(move |client| client.instant_answers(&query, &options))
            .await
    }

    pub async fn advanced_search(
        &self,
        query: impl Into<String>,
        options: SearchOptions,
        advanced: Vec<(String, String)>,
    ) -> Result<ResultPage> {
        let query = query.into();
        self.run(move |client| client.advanced_search(&query, &options, advanced))
            .await
    }

    /// Pure, so it runs inline.
    pub fn get_search_url(
        &self,
        query: &str,
        category: Category,
        extra: &[(String, String)],
    ) -> String {
        self.inner.get_search_url(query, category, extra)
    }
}

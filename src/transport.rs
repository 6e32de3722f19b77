use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::endpoints::DEFAULT_HEADERS;
use crate::error::{Result, StartpageError};
use crate::request::ParameterSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form-encoded body, only for POST.
    pub form: Option<Vec<(String, String)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Already decompressed.
    pub body: Vec<u8>,
}

/// Executes one HTTP exchange. Status codes are returned as-is; mapping them
/// to errors is the [`Transport`]'s job.
pub trait HttpBackend: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking reqwest backend. gzip, deflate and brotli bodies are decoded by
/// reqwest before they reach us.
///
/// The underlying client is built on first use: `reqwest::blocking` refuses to
/// start inside an async context, and the async facade only ever calls us from
/// tokio's blocking pool.
pub struct ReqwestBackend {
    proxy: Option<reqwest::Proxy>,
    timeout: Duration,
    client: OnceCell<reqwest::blocking::Client>,
}

impl ReqwestBackend {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let proxy = config
            .proxy
            .as_deref()
            .map(reqwest::Proxy::all)
            .transpose()
            .map_err(|e| StartpageError::InvalidRequest(format!("invalid proxy: {e}")))?;
        Ok(Self {
            proxy,
            timeout: config.timeout,
            client: OnceCell::new(),
        })
    }

    fn client(&self) -> Result<&reqwest::blocking::Client> {
        self.client.get_or_try_init(|| {
            let mut builder = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .gzip(true)
                .deflate(true)
                .brotli(true);
            if let Some(proxy) = &self.proxy {
                builder = builder.proxy(proxy.clone());
            }
            builder
                .build()
                .map_err(|e| StartpageError::Transport(format!("failed to build HTTP client: {e}")))
        })
    }
}

impl HttpBackend for ReqwestBackend {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let client = self.client()?;
        let mut builder = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(map_reqwest_error)?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> StartpageError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        StartpageError::Network(e.to_string())
    } else {
        StartpageError::Transport(format!("request failed due to an unexpected error: {e}"))
    }
}

/// Enforces the minimum delay between consecutive requests of one client.
#[derive(Debug)]
pub struct Throttle {
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Instant stamped by the most recent [`wait`](Self::wait).
    pub fn last_request(&self) -> Option<Instant> {
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleeps until `delay` has passed since the previous call, then stamps
    /// the current instant. The slot stays locked while sleeping, so threads
    /// sharing a client queue up behind each other.
    pub fn wait(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.delay {
                let remaining = self.delay - elapsed;
                tracing::debug!("throttling for {:?}", remaining);
                thread::sleep(remaining);
            }
        }
        *last = Some(Instant::now());
    }
}

pub struct Transport {
    backend: Arc<dyn HttpBackend>,
    throttle: Throttle,
}

impl Transport {
    pub fn new(backend: Arc<dyn HttpBackend>, delay: Duration) -> Self {
        Self {
            backend,
            throttle: Throttle::new(delay),
        }
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Sends a POST when `form` holds parameters, a GET otherwise, and
    /// returns the body as text. Undecodable bytes are replaced rather than
    /// rejected.
    pub fn send(
        &self,
        url: &str,
        form: Option<&ParameterSet>,
        referer: Option<&str>,
    ) -> Result<String> {
        self.throttle.wait();

        let mut headers: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(referer) = referer {
            headers.push(("Referer".to_string(), referer.to_string()));
        }

        let form = form.filter(|f| !f.is_empty()).map(|f| f.pairs().to_vec());
        let method = if form.is_some() {
            Method::Post
        } else {
            Method::Get
        };
        tracing::info!("{:?} {}", method, url);

        let response = self.backend.execute(&HttpRequest {
            method,
            url: url.to_string(),
            headers,
            form,
        })?;

        check_status(response.status)?;
        Ok(String::from_utf8_lossy(&response.body).into_owned())
    }
}

fn check_status(status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown");
    if status == 429 {
        tracing::warn!("rate limited by upstream");
        return Err(StartpageError::RateLimited(format!(
            "Rate limit exceeded: {status} {reason}"
        )));
    }
    Err(StartpageError::Http {
        status,
        message: format!("HTTP error: {status} {reason}"),
    })
}

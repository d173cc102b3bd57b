//! Content loading - the network fetch behind every panel open
//!
//! The controller talks to a [`ContentLoader`] through a completion callback
//! and an abortable handle; the default implementation performs a blocking
//! GET on a worker thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use serde::Deserialize;

/// Header naming the page fragment the server should render
pub const HTML_PARTIAL_HEADER: &str = "X-HTML-PARTIAL";

/// Default partial-render hint
pub const DEFAULT_PARTIAL: &str = "#main-content";

/// One content fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub url: String,
    /// Sent as the `X-HTML-PARTIAL` header
    pub partial: String,
}

impl ContentRequest {
    pub fn new(url: impl Into<String>, partial: Option<String>) -> Self {
        Self {
            url: url.into(),
            partial: partial.unwrap_or_else(|| DEFAULT_PARTIAL.to_string()),
        }
    }
}

/// The JSON body a content endpoint returns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentPayload {
    pub title: String,
    pub html: String,
}

/// Completion callback; errors are flattened to strings at the channel
/// boundary
pub type LoadCallback = Box<dyn FnOnce(Result<ContentPayload, String>) + Send>;

/// Handle to an in-flight fetch, owned by the panel state
#[derive(Debug, Clone)]
pub struct LoadHandle {
    aborted: Arc<AtomicBool>,
}

impl LoadHandle {
    pub fn new() -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

impl Default for LoadHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches panel content. Implementations must not invoke the callback once
/// the returned handle is aborted.
pub trait ContentLoader {
    fn fetch(&self, request: ContentRequest, done: LoadCallback) -> LoadHandle;
}

/// Default loader: blocking GET expecting a `{title, html}` JSON body
pub struct HttpContentLoader {
    client: reqwest::blocking::Client,
}

impl HttpContentLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    fn fetch_payload(
        client: &reqwest::blocking::Client,
        request: &ContentRequest,
    ) -> anyhow::Result<ContentPayload> {
        let response = client
            .get(&request.url)
            .header(HTML_PARTIAL_HEADER, &request.partial)
            .send()
            .with_context(|| format!("request to {} failed", request.url))?
            .error_for_status()
            .with_context(|| format!("request to {} rejected", request.url))?;

        response
            .json::<ContentPayload>()
            .with_context(|| format!("invalid content payload from {}", request.url))
    }
}

impl Default for HttpContentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentLoader for HttpContentLoader {
    fn fetch(&self, request: ContentRequest, done: LoadCallback) -> LoadHandle {
        let handle = LoadHandle::new();
        let guard = handle.clone();
        let client = self.client.clone();
        thread::spawn(move || {
            let result = Self::fetch_payload(&client, &request).map_err(|e| format!("{e:#}"));
            if guard.is_aborted() {
                tracing::debug!(url = %request.url, "dropping aborted content response");
                return;
            }
            done(result);
        });
        handle
    }
}

//! HTTP transport to the TeaBreak backend.
//!
//! One [`HttpBackend`] holds a `reqwest` client with a cookie store, so the
//! session cookie set by sign-in is sent with every later request.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use teabreak_core::{Descriptor, Error, Method, Result, Retrieval, Retriever};

use crate::config::ClientConfig;
use crate::envelope::Envelope;

/// Form fields or query parameters.
pub type Params<'a> = &'a [(&'a str, String)];

/// Backend client shared by list retrieval, lookups and mutations.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Create a backend client from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            subsystem = "client",
            base_url = %config.base_url,
            timeout_secs = config.timeout_secs,
            "Initializing TeaBreak backend client"
        );

        Ok(Self { client, config })
    }

    /// Create from `TEABREAK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.trimmed_base_url(), path.trim_start_matches('/'))
    }

    /// GET with query parameters.
    pub async fn get(&self, path: &str, query: Params<'_>) -> Result<Envelope> {
        let request = self.client.get(self.url(path)).query(query);
        self.execute("GET", path, request).await
    }

    /// POST url-encoded form fields.
    pub async fn post_form(&self, path: &str, form: Params<'_>) -> Result<Envelope> {
        let request = self.client.post(self.url(path)).form(form);
        self.execute("POST", path, request).await
    }

    /// POST a JSON body.
    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Envelope> {
        let request = self.client.post(self.url(path)).json(body);
        self.execute("POST", path, request).await
    }

    /// Issue a retrieval descriptor: GET parameters go in the query string,
    /// POST parameters in a form body.
    pub async fn send(&self, descriptor: &Descriptor) -> Result<Envelope> {
        let request = match descriptor.method {
            Method::Get => self
                .client
                .get(self.url(&descriptor.path))
                .query(&descriptor.params),
            Method::Post => self
                .client
                .post(self.url(&descriptor.path))
                .form(&descriptor.params),
        };
        let verb = match descriptor.method {
            Method::Get => "GET",
            Method::Post => "POST",
        };
        self.execute(verb, &descriptor.path, request).await
    }

    async fn execute(&self, verb: &str, path: &str, request: RequestBuilder) -> Result<Envelope> {
        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| Error::Request(format!("{} {} failed: {}", verb, path, e)))?;
        let envelope = read_envelope(response).await;

        debug!(
            subsystem = "client",
            component = "http",
            method = verb,
            path,
            success = envelope.as_ref().is_ok_and(Envelope::is_success),
            code = envelope.as_ref().ok().map(|e| e.code),
            duration_ms = start.elapsed().as_millis() as u64,
            "Backend request complete"
        );
        envelope
    }
}

async fn read_envelope(response: Response) -> Result<Envelope> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Request(format!("HTTP {}: {}", status.as_u16(), body)));
    }
    response
        .json::<Envelope>()
        .await
        .map_err(|e| Error::Serialization(format!("Failed to parse envelope: {}", e)))
}

#[async_trait]
impl Retriever for HttpBackend {
    async fn retrieve(&self, descriptor: &Descriptor) -> Retrieval {
        match self.send(descriptor).await {
            Ok(envelope) => envelope.into_retrieval(),
            Err(e) => {
                warn!(
                    subsystem = "client",
                    descriptor = %descriptor,
                    error = %e,
                    "Retrieval transport failure"
                );
                Retrieval::failure(e.to_string())
            }
        }
    }
}

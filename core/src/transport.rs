//! The seam between the facade and a real HTTP client.
//!
//! # Design
//! `Transport` is a single async call from `RequestOptions` to a response.
//! `UreqTransport` implements it on a blocking `ureq` agent, running each
//! request on tokio's blocking pool so the caller's task only suspends.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::config::HttpConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpResponse, RequestOptions};

/// Executes a request described by `RequestOptions`.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn send(&self, options: RequestOptions) -> Result<Self::Response, Self::Error>;
}

/// `ureq`-backed transport configured by an `HttpConfig`.
///
/// `send` must be awaited inside a tokio runtime; requests run on its
/// blocking pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    config: Arc<HttpConfig>,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: HttpConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(config.status_as_error)
            .build()
            .new_agent();
        Self {
            agent,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for UreqTransport {
    type Response = HttpResponse;
    type Error = TransportError;

    async fn send(&self, options: RequestOptions) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let config = Arc::clone(&self.config);
        tokio::task::spawn_blocking(move || execute(&agent, &config, options)).await?
    }
}

fn execute(
    agent: &Agent,
    config: &HttpConfig,
    options: RequestOptions,
) -> Result<HttpResponse, TransportError> {
    let url = config.url_for(&options.url);
    let query = options.params.as_ref().map(query_pairs).unwrap_or_default();

    let mut response = match options.method {
        HttpMethod::Get => decorate(agent.get(&url), config, &query).call()?,
        HttpMethod::Delete => decorate(agent.delete(&url), config, &query).call()?,
        HttpMethod::Post => send_body(decorate(agent.post(&url), config, &query), options.data.as_ref())?,
        HttpMethod::Put => send_body(decorate(agent.put(&url), config, &query), options.data.as_ref())?,
    };

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_string()?;
    debug!(method = %options.method, %url, status, "transport returned");

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn decorate<B>(
    mut request: RequestBuilder<B>,
    config: &HttpConfig,
    query: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in &config.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    for (key, value) in query {
        request = request.query(key, value);
    }
    request
}

fn send_body(
    request: RequestBuilder<WithBody>,
    data: Option<&Value>,
) -> Result<ureq::http::Response<ureq::Body>, TransportError> {
    match data {
        Some(data) => {
            let body = serde_json::to_vec(data)?;
            Ok(request.content_type("application/json").send(&body[..])?)
        }
        None => Ok(request.send_empty()?),
    }
}

/// Flatten a params object into query pairs.
///
/// Strings are used verbatim, other scalars as JSON text, arrays repeat the
/// key per element, and nulls are dropped.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        debug!("ignoring non-object query params");
        return Vec::new();
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().filter_map(scalar_text).map(|v| (key.clone(), v)));
            }
            other => {
                if let Some(text) = scalar_text(other) {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    pairs
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

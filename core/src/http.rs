//! HTTP request options and responses as plain data.
//!
//! # Design
//! `RequestOptions` is the record a facade verb builds and a `Transport`
//! consumes. It says nothing about hosts, headers, or encoding; those belong
//! to the transport. Payloads stay as `serde_json::Value` so the facade never
//! needs to know the caller's types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method for a request.
///
/// Serializes uppercase for every verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// Where a verb puts the caller's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSlot {
    /// Query string parameters.
    Params,
    /// Request body.
    Body,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET and DELETE carry data as query parameters, PUT and POST as a body.
    pub fn payload_slot(self) -> PayloadSlot {
        match self {
            HttpMethod::Get | HttpMethod::Delete => PayloadSlot::Params,
            HttpMethod::Post | HttpMethod::Put => PayloadSlot::Body,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request described as plain data: method, path and payload.
///
/// Built by `Http` verb helpers (or by hand) and handed to a `Transport`
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RequestOptions {
    /// Build options for `method`, prefixing `url` with `/` and placing
    /// `data` in the slot the method calls for.
    pub fn for_method(method: HttpMethod, url: &str, data: Option<Value>) -> Self {
        let url = format!("/{url}");
        match method.payload_slot() {
            PayloadSlot::Params => Self {
                method,
                url,
                params: data,
                data: None,
            },
            PayloadSlot::Body => Self {
                method,
                url,
                params: None,
                data,
            },
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

//! Verb helpers over a single `request` entry point.
//!
//! # Design
//! `Http` holds only its transport and carries no state between calls. Each
//! verb reshapes a `RequestDescriptor` into `RequestOptions` and hands it,
//! with an optional `ValidationDescriptor`, to `request`. Validation runs to
//! completion before the transport is touched; a failure returns early and
//! nothing is sent.

use tracing::debug;

use crate::error::RequestError;
use crate::http::{HttpMethod, RequestOptions};
use crate::transport::Transport;
use crate::types::{RequestDescriptor, ValidationDescriptor};
use crate::validator::validate_request;

pub type RequestResult<T> =
    Result<<T as Transport>::Response, RequestError<<T as Transport>::Error>>;

/// HTTP facade over a `Transport`.
#[derive(Debug, Clone)]
pub struct Http<T> {
    transport: T,
}

impl<T: Transport> Http<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `descriptor` if given, then forward `options` unchanged.
    pub async fn request(
        &self,
        options: RequestOptions,
        descriptor: Option<ValidationDescriptor>,
    ) -> RequestResult<T> {
        if let Some(descriptor) = descriptor {
            validate_request(descriptor.fields, &descriptor.rules)?;
        }
        debug!(method = %options.method, url = %options.url, "dispatching request");
        self.transport
            .send(options)
            .await
            .map_err(RequestError::Transport)
    }

    pub async fn get(
        &self,
        req: RequestDescriptor,
        descriptor: Option<ValidationDescriptor>,
    ) -> RequestResult<T> {
        self.request(build_options(HttpMethod::Get, req), descriptor).await
    }

    pub async fn put(
        &self,
        req: RequestDescriptor,
        descriptor: Option<ValidationDescriptor>,
    ) -> RequestResult<T> {
        self.request(build_options(HttpMethod::Put, req), descriptor).await
    }

    pub async fn post(
        &self,
        req: RequestDescriptor,
        descriptor: Option<ValidationDescriptor>,
    ) -> RequestResult<T> {
        self.request(build_options(HttpMethod::Post, req), descriptor).await
    }

    pub async fn delete(
        &self,
        req: RequestDescriptor,
        descriptor: Option<ValidationDescriptor>,
    ) -> RequestResult<T> {
        self.request(build_options(HttpMethod::Delete, req), descriptor).await
    }
}

/// Shape a descriptor into the options a verb sends.
pub fn build_options(method: HttpMethod, req: RequestDescriptor) -> RequestOptions {
    RequestOptions::for_method(method, &req.url, req.data)
}

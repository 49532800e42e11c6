//! HTTP facade with pre-flight request validation.
//!
//! # Overview
//! `Http` exposes `get`, `put`, `post` and `delete` helpers that reshape a
//! path and payload into `RequestOptions` and forward them to a `Transport`.
//! Any call may carry a `ValidationDescriptor`; its fields are checked against
//! its rules first, and a failure stops the request before anything is sent.
//!
//! # Design
//! - `Http` is stateless apart from its transport; calls are independent.
//! - GET and DELETE send data as query params, PUT and POST as a JSON body.
//! - Validation outcomes are `Result`s; transport errors pass through as-is.
//! - `UreqTransport` is the bundled transport. Tests swap in their own.

pub mod config;
pub mod error;
pub mod facade;
pub mod http;
pub mod transport;
pub mod types;
pub mod validator;

pub use config::HttpConfig;
pub use error::{RequestError, TransportError};
pub use facade::{build_options, Http, RequestResult};
pub use http::{HttpMethod, HttpResponse, PayloadSlot, RequestOptions};
pub use transport::{Transport, UreqTransport};
pub use types::{RequestDescriptor, ValidationDescriptor};
pub use validator::{
    validate_request, FieldError, FieldType, Rule, Rules, ValidationFailure, ValidationOutcome,
    ValidationStatus, ValidationSuccess, IS_ARRAY, IS_NUMBER, IS_OBJECT, IS_REQUIRED, IS_STRING,
};

//! Caller-facing DTOs for the facade.
//!
//! Both descriptors live for a single call. The facade never stores them.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::validator::Rules;

/// Path and optional payload for one verb call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestDescriptor {
    pub url: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Fields and rules checked before a request is sent. Either may be omitted
/// and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationDescriptor {
    #[serde(default)]
    pub fields: Map<String, Value>,
    #[serde(default)]
    pub rules: Rules,
}

impl ValidationDescriptor {
    pub fn new(fields: Map<String, Value>, rules: Rules) -> Self {
        Self { fields, rules }
    }
}

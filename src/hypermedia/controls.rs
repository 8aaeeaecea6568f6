//! Control descriptors for the `@controls` response map

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single hypermedia control: where the action lives and, for mutating
/// actions, what the request body must look like.
#[derive(Debug, Clone, Serialize)]
pub struct Control {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl Control {
    /// A plain GET control (method omitted per Mason convention)
    pub fn get(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: None,
            encoding: None,
            title: None,
            schema: None,
        }
    }

    /// A POST control with a JSON request schema
    pub fn post(href: impl Into<String>, schema: Value) -> Self {
        Self {
            href: href.into(),
            method: Some("POST"),
            encoding: Some("json"),
            title: None,
            schema: Some(schema),
        }
    }

    /// A PUT control with a JSON request schema
    pub fn put(href: impl Into<String>, schema: Value) -> Self {
        Self {
            href: href.into(),
            method: Some("PUT"),
            encoding: Some("json"),
            title: None,
            schema: Some(schema),
        }
    }

    /// A DELETE control
    pub fn delete(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            method: Some("DELETE"),
            encoding: None,
            title: None,
            schema: None,
        }
    }

    /// Attach a human-readable title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// An ordered map of relation name to control, serialized as the
/// `@controls` object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Controls(BTreeMap<String, Control>);

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, rel: &str, control: Control) -> Self {
        self.0.insert(rel.to_string(), control);
        self
    }

    /// Serialize to a JSON value for embedding in a response body
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}

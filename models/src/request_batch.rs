//! Ordered batch of data-warehouse series requests.
//!
//! Items are opaque JSON objects. The batch only ever overwrites fields on
//! them; it never reorders, drops or deduplicates items.

use crate::{ErrorLocation, ModelError};

use std::panic::Location;

use serde_json::{Map, Value};

pub const SNAPSHOT_TIME_KEY: &str = "snapshot_time";

/// Member holding the item array when a request document is a settings object.
pub const JSON_REQUEST_KEY: &str = "json_request";

/// Shape the batch was read from, so it can be written back the same way.
#[derive(Debug, Clone, PartialEq)]
enum DocumentShape {
    /// A bare JSON array of request items.
    Array,
    /// An object whose `json_request` member is the item array. The other
    /// members are kept untouched; `json_request` holds `null` until the
    /// document is rebuilt.
    Settings(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataRequestBatch {
    items: Vec<Map<String, Value>>,
    shape: DocumentShape,
}

impl DataRequestBatch {
    pub fn new(items: Vec<Map<String, Value>>) -> Self {
        Self {
            items,
            shape: DocumentShape::Array,
        }
    }

    /// Read a batch from a request document.
    ///
    /// Accepts a bare array of objects or an object with a `json_request`
    /// array member.
    #[track_caller]
    pub fn from_value(document: Value) -> Result<Self, ModelError> {
        match document {
            Value::Array(items) => Ok(Self {
                items: into_objects(items)?,
                shape: DocumentShape::Array,
            }),
            Value::Object(mut settings) => match settings.get_mut(JSON_REQUEST_KEY).map(Value::take) {
                Some(Value::Array(items)) => Ok(Self {
                    items: into_objects(items)?,
                    shape: DocumentShape::Settings(settings),
                }),
                Some(_) => Err(ModelError::Validation {
                    message: format!("'{JSON_REQUEST_KEY}' must be an array of request objects"),
                    location: ErrorLocation::from(Location::caller()),
                }),
                None => Err(ModelError::Validation {
                    message: format!("Request document has no '{JSON_REQUEST_KEY}' member"),
                    location: ErrorLocation::from(Location::caller()),
                }),
            },
            other => Err(ModelError::Validation {
                message: format!(
                    "Request document must be an array or an object, got {}",
                    json_type_name(&other)
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    pub fn items(&self) -> &[Map<String, Value>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Set `snapshot_time` on every item, overwriting any existing value.
    pub fn stamp_snapshot_time(&mut self, timestamp: &str) {
        for item in &mut self.items {
            item.insert(
                SNAPSHOT_TIME_KEY.to_string(),
                Value::String(timestamp.to_string()),
            );
        }
    }

    /// Overwrite every key of `params` on every item.
    pub fn apply_params(&mut self, params: &Map<String, Value>) {
        for item in &mut self.items {
            for (key, value) in params {
                item.insert(key.clone(), value.clone());
            }
        }
    }

    /// Replace a present but empty (`null` or `""`) `snapshot_time` with `now`.
    ///
    /// Items without the key are left alone.
    pub fn fill_empty_snapshot_times(&mut self, now: &str) {
        for item in &mut self.items {
            if let Some(value) = item.get_mut(SNAPSHOT_TIME_KEY)
                && is_blank(value)
            {
                *value = Value::String(now.to_string());
            }
        }
    }

    /// The JSON array submitted to the retrieve endpoint.
    pub fn to_request_body(&self) -> Value {
        Value::Array(self.items.iter().cloned().map(Value::Object).collect())
    }

    /// The batch in the shape it was read from.
    pub fn into_document(self) -> Value {
        let items = Value::Array(self.items.into_iter().map(Value::Object).collect());
        match self.shape {
            DocumentShape::Array => items,
            DocumentShape::Settings(mut settings) => {
                settings.insert(JSON_REQUEST_KEY.to_string(), items);
                Value::Object(settings)
            }
        }
    }
}

#[track_caller]
fn into_objects(items: Vec<Value>) -> Result<Vec<Map<String, Value>>, ModelError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(ModelError::Validation {
                message: format!(
                    "Request item {index} must be an object, got {}",
                    json_type_name(&other)
                ),
                location: ErrorLocation::from(Location::caller()),
            }),
        })
        .collect()
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! # Declarative Subscription Definitions
//!
//! Subscriptions can also be described as data, for example a JSON file
//! shipped next to the service:
//!
//! ```json
//! [
//!   {"path": "/orders", "pubsub": "orders-pubsub", "topic": "new-order",
//!    "tags": ["orders"], "metadata": {"rawPayload": "true"},
//!    "dead_letter_topic": "orders-dlq"}
//! ]
//! ```
//!
//! Values arriving this way are untyped, so every field is checked before a
//! [`Subscribe`] builder is produced. Type errors name the offending field,
//! e.g. `Expected string for "path"`.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::constants::params;
use crate::error::{DaprError, Result};
use crate::subscription::Subscribe;

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDefinition {
    pub path: String,
    pub pubsub: String,
    pub topic: String,
    pub tags: Option<Vec<String>>,
    pub metadata: BTreeMap<String, String>,
    pub dead_letter_topic: Option<String>,
    pub extra: Map<String, Value>,
}

impl SubscriptionDefinition {
    /// Validate and convert one definition object
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or(DaprError::type_mismatch("object", params::SUBSCRIPTION))?;

        // Checked in declaration order so the first bad field is the one reported
        let path = required_string(object, params::PATH)?;
        let pubsub = required_string(object, params::PUBSUB)?;
        let topic = required_string(object, params::TOPIC)?;
        let tags = optional_tags(object)?;
        let metadata = optional_metadata(object)?;
        let dead_letter_topic = optional_string(object, params::DEAD_LETTER_TOPIC)?;
        let extra = match present(object, params::EXTRA) {
            None => Map::new(),
            Some(Value::Object(extra)) => extra.clone(),
            Some(_) => return Err(DaprError::type_mismatch("mapping", params::EXTRA)),
        };

        Ok(Self {
            path,
            pubsub,
            topic,
            tags,
            metadata,
            dead_letter_topic,
            extra,
        })
    }

    /// Parse a JSON array of definitions
    pub fn list_from_str(json: &str) -> Result<Vec<Self>> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| DaprError::configuration(format!("Invalid definitions JSON: {e}")))?;

        match value {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            _ => Err(DaprError::configuration(
                "Subscription definitions must be a JSON array",
            )),
        }
    }

    pub fn into_subscribe(self) -> Subscribe {
        let mut subscribe = Subscribe::new(self.path, self.pubsub, self.topic)
            .tags(self.tags.unwrap_or_default())
            .metadata(self.metadata)
            .extra(self.extra);
        if let Some(dead_letter_topic) = self.dead_letter_topic {
            subscribe = subscribe.dead_letter_topic(dead_letter_topic);
        }
        subscribe
    }
}

/// Read and validate every definition in the JSON file at `path`
pub fn load_definitions(path: &Path) -> Result<Vec<SubscriptionDefinition>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        DaprError::configuration(format!(
            "Failed to read subscription definitions {}: {e}",
            path.display()
        ))
    })?;

    let definitions = SubscriptionDefinition::list_from_str(&contents)?;
    debug!(
        file = %path.display(),
        count = definitions.len(),
        "Loaded subscription definitions"
    );
    Ok(definitions)
}

/// A key counts as absent when missing or explicitly `null`
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn required_string(object: &Map<String, Value>, param: &'static str) -> Result<String> {
    match present(object, param) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(DaprError::type_mismatch("string", param)),
        None => Err(DaprError::missing(param)),
    }
}

fn optional_string(object: &Map<String, Value>, param: &'static str) -> Result<Option<String>> {
    match present(object, param) {
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(DaprError::type_mismatch("string", param)),
        None => Ok(None),
    }
}

fn optional_tags(object: &Map<String, Value>) -> Result<Option<Vec<String>>> {
    let Some(value) = present(object, params::TAGS) else {
        return Ok(None);
    };
    let Value::Array(items) = value else {
        return Err(DaprError::type_mismatch("list", params::TAGS));
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(tag) => Ok(tag.clone()),
            _ => Err(DaprError::type_mismatch("string", params::TAGS)),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn optional_metadata(object: &Map<String, Value>) -> Result<BTreeMap<String, String>> {
    let Some(value) = present(object, params::METADATA) else {
        return Ok(BTreeMap::new());
    };
    let Value::Object(entries) = value else {
        return Err(DaprError::type_mismatch("mapping", params::METADATA));
    };

    entries
        .iter()
        .map(|(key, value)| match value {
            Value::String(value) => Ok((key.clone(), value.clone())),
            _ => Err(DaprError::type_mismatch("string", params::METADATA)),
        })
        .collect()
}

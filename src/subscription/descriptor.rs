//! # Subscription Descriptor
//!
//! The metadata attached to one subscription route, and the discovery record
//! extracted from it.

use crate::constants::fields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Structured metadata identifying the pubsub component, topic and delivery
/// options for one route.
///
/// Serializes to the shape Dapr expects inside a route's `dapr` attribute:
///
/// ```text
/// {"pubsubname": "...", "topic": "...", "metadata": {...}, "deadLetterTopic": "..."}
/// ```
///
/// `deadLetterTopic` is omitted entirely when no dead letter topic was supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDescriptor {
    #[serde(rename = "pubsubname")]
    pub pubsub_name: String,
    pub topic: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(
        rename = "deadLetterTopic",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dead_letter_topic: Option<String>,
}

impl SubscriptionDescriptor {
    pub fn new(pubsub_name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            pubsub_name: pubsub_name.into(),
            topic: topic.into(),
            metadata: BTreeMap::new(),
            dead_letter_topic: None,
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_dead_letter_topic(mut self, dead_letter_topic: Option<String>) -> Self {
        self.dead_letter_topic = dead_letter_topic;
        self
    }

    /// JSON view of the descriptor as it appears under the `dapr` key
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(fields::PUBSUB_NAME.to_string(), Value::from(self.pubsub_name.as_str()));
        object.insert(fields::TOPIC.to_string(), Value::from(self.topic.as_str()));
        object.insert(
            fields::METADATA.to_string(),
            Value::Object(
                self.metadata
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                    .collect(),
            ),
        );
        if let Some(dead_letter_topic) = &self.dead_letter_topic {
            object.insert(
                fields::DEAD_LETTER_TOPIC.to_string(),
                Value::from(dead_letter_topic.as_str()),
            );
        }
        Value::Object(object)
    }

    /// Build the discovery record for this descriptor served at `route`
    pub fn entry_for(&self, route: impl Into<String>) -> SubscriptionEntry {
        SubscriptionEntry {
            pubsub_name: self.pubsub_name.clone(),
            topic: self.topic.clone(),
            route: route.into(),
            metadata: self.metadata.clone(),
        }
    }
}

/// One element of the `GET /dapr/subscribe` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEntry {
    #[serde(rename = "pubsubname")]
    pub pubsub_name: String,
    pub topic: String,
    pub route: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_omits_absent_dead_letter_topic() {
        let descriptor = SubscriptionDescriptor::new("orders-pubsub", "new-order");

        assert_eq!(
            descriptor.to_value(),
            json!({"pubsubname": "orders-pubsub", "topic": "new-order", "metadata": {}})
        );
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            descriptor.to_value()
        );
    }

    #[test]
    fn test_descriptor_with_options() {
        let descriptor = SubscriptionDescriptor::new("pubsub", "topic")
            .with_metadata(BTreeMap::from([("rawPayload".to_string(), "true".to_string())]))
            .with_dead_letter_topic(Some("dead".to_string()));

        let expected = json!({
            "pubsubname": "pubsub",
            "topic": "topic",
            "metadata": {"rawPayload": "true"},
            "deadLetterTopic": "dead"
        });
        assert_eq!(descriptor.to_value(), expected);
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), expected);
    }

    #[test]
    fn test_entry_wire_shape() {
        let entry = SubscriptionDescriptor::new("orders-pubsub", "new-order")
            .with_dead_letter_topic(Some("ignored-in-discovery".to_string()))
            .entry_for("/orders");

        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "pubsubname": "orders-pubsub",
                "topic": "new-order",
                "route": "/orders",
                "metadata": {}
            })
        );
    }
}

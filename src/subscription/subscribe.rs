//! # Subscription Registrar
//!
//! Registers a handler as a Dapr pubsub subscription endpoint: the handler is
//! served as `POST <path>` and the route gets a [`SubscriptionDescriptor`]
//! attached so the discovery aggregator can find it later.
//!
//! ```rust,no_run
//! use axum::Json;
//! use axum_dapr_helper::{Subscribe, SubscriptionRouter};
//! use serde_json::{json, Value};
//!
//! async fn on_new_order(Json(event): Json<Value>) -> Json<Value> {
//!     tracing::info!(%event, "new order");
//!     Json(json!({"status": "SUCCESS"}))
//! }
//!
//! # fn main() -> axum_dapr_helper::Result<()> {
//! let mut app: SubscriptionRouter = SubscriptionRouter::new();
//!
//! Subscribe::new("/orders", "orders-pubsub", "new-order")
//!     .tag("orders")
//!     .dead_letter_topic("orders-dlq")
//!     .register(&mut app, on_new_order)?;
//! # Ok(())
//! # }
//! ```

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::post;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::constants::params;
use crate::error::{DaprError, Result};
use crate::subscription::SubscriptionDescriptor;
use crate::web::route_table::{validate_route_path, RouteRecord, RouteTable};

/// Builder for one subscription route.
///
/// The three required parameters are constructor arguments; everything else is
/// optional. Nothing touches the route table until [`Subscribe::register`].
#[derive(Debug, Clone, PartialEq)]
pub struct Subscribe {
    path: String,
    pubsub: String,
    topic: String,
    tags: Vec<String>,
    metadata: BTreeMap<String, String>,
    dead_letter_topic: Option<String>,
    extra: Map<String, Value>,
}

impl Subscribe {
    pub fn new(
        path: impl Into<String>,
        pubsub: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            pubsub: pubsub.into(),
            topic: topic.into(),
            tags: Vec::new(),
            metadata: BTreeMap::new(),
            dead_letter_topic: None,
            extra: Map::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Replace the component-specific metadata
    pub fn metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn metadata_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn dead_letter_topic(mut self, topic: impl Into<String>) -> Self {
        self.dead_letter_topic = Some(topic.into());
        self
    }

    /// Extra attributes carried on the route record. A `dapr` key in here is
    /// dropped: the descriptor built from this subscription always wins.
    pub fn extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn validate(&self) -> Result<()> {
        validate_route_path(&self.path)?;
        require_non_empty(&self.pubsub, params::PUBSUB)?;
        require_non_empty(&self.topic, params::TOPIC)?;
        if self.tags.iter().any(|tag| tag.is_empty()) {
            return Err(DaprError::type_mismatch(
                "list of non-empty strings",
                params::TAGS,
            ));
        }
        if let Some(dead_letter_topic) = &self.dead_letter_topic {
            require_non_empty(dead_letter_topic, params::DEAD_LETTER_TOPIC)?;
        }
        Ok(())
    }

    pub fn descriptor(&self) -> SubscriptionDescriptor {
        SubscriptionDescriptor::new(&self.pubsub, &self.topic)
            .with_metadata(self.metadata.clone())
            .with_dead_letter_topic(self.dead_letter_topic.clone())
    }

    /// Validate, then register `handler` as `POST <path>` on `app` with the
    /// descriptor attached. Returns the handler so it stays callable on its own.
    ///
    /// On error the route table is left exactly as it was.
    pub fn register<R, H, T>(self, app: &mut R, handler: H) -> Result<H>
    where
        R: RouteTable,
        H: Handler<T, R::State>,
        T: 'static,
    {
        self.validate()?;

        let descriptor = self.descriptor();
        let record = RouteRecord::new(Method::POST, self.path)
            .with_tags(self.tags)
            .with_extra(self.extra);
        let key = record.key();

        app.add_route(record, post(handler.clone()))?;
        debug!(
            route = %key,
            pubsub = %descriptor.pubsub_name,
            topic = %descriptor.topic,
            "Registered subscription route"
        );
        app.attach_subscription(key, descriptor);

        Ok(handler)
    }
}

/// Shorthand for [`Subscribe::new`] followed by [`Subscribe::register`] when no
/// optional parameters are needed.
pub fn subscribe<R, H, T>(
    app: &mut R,
    path: impl Into<String>,
    pubsub: impl Into<String>,
    topic: impl Into<String>,
    handler: H,
) -> Result<H>
where
    R: RouteTable,
    H: Handler<T, R::State>,
    T: 'static,
{
    Subscribe::new(path, pubsub, topic).register(app, handler)
}

fn require_non_empty(value: &str, param: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(DaprError::type_mismatch("non-empty string", param));
    }
    Ok(())
}

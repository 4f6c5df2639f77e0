//! # Discovery Endpoint Handler
//!
//! `GET /dapr/subscribe` returns the subscription registry as a JSON array:
//!
//! ```text
//! [{"pubsubname": "orders-pubsub", "topic": "new-order", "route": "/orders", "metadata": {}}]
//! ```

use axum::routing::{get, MethodRouter};
use axum::{Extension, Json};

use crate::registry::SubscriptionRegistry;
use crate::subscription::SubscriptionEntry;

/// Discovery endpoint: GET /dapr/subscribe
///
/// Serves the registry as it is at request time.
pub async fn list_subscriptions(
    Extension(registry): Extension<SubscriptionRegistry>,
) -> Json<Vec<SubscriptionEntry>> {
    Json(registry.snapshot())
}

/// Method router for the discovery endpoint, bound to `registry`. Works with
/// any router state.
pub fn subscribe_route<S>(registry: SubscriptionRegistry) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get(list_subscriptions).layer(Extension(registry))
}

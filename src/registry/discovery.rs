//! # Dapr Discovery
//!
//! Harvests the subscription descriptors attached by the registrar and serves
//! them at `GET /dapr/subscribe`, the endpoint the Dapr sidecar reads to learn
//! which topics this app consumes and where to deliver them.
//!
//! Call [`DaprDiscovery::generate_subscribe_route`] once, after every
//! subscription route is registered. Routes added afterward are only picked up
//! by another explicit extraction.
//!
//! Extraction appends to the registry without deduplication. Running it twice
//! over the same table duplicates every entry unless `remove_dapr_data` is set,
//! in which case the first pass strips the descriptors and the second finds
//! nothing.

use axum::http::Method;
use tracing::{debug, info, warn};

use crate::config::DaprSettings;
use crate::constants::DISCOVERY_PATH;
use crate::error::Result;
use crate::logging::log_subscription_operation;
use crate::registry::SubscriptionRegistry;
use crate::subscription::SubscriptionEntry;
use crate::web::handlers::discovery::subscribe_route;
use crate::web::route_table::{RouteKey, RouteRecord, RouteTable};

#[derive(Debug, Clone, Default)]
pub struct DaprDiscovery {
    remove_dapr_data: bool,
    subscriptions: SubscriptionRegistry,
}

impl DaprDiscovery {
    /// `remove_dapr_data` strips each descriptor from its route once recorded
    pub fn new(remove_dapr_data: bool) -> Self {
        Self {
            remove_dapr_data,
            subscriptions: SubscriptionRegistry::new(),
        }
    }

    pub fn from_settings(settings: &DaprSettings) -> Self {
        Self::new(settings.remove_dapr_data)
    }

    pub fn remove_dapr_data(&self) -> bool {
        self.remove_dapr_data
    }

    /// Everything extracted so far, in extraction order
    pub fn subscriptions(&self) -> Vec<SubscriptionEntry> {
        self.subscriptions.snapshot()
    }

    /// Scan `app` in route order, append one entry per route carrying a
    /// descriptor, and return the whole registry. Routes without a descriptor
    /// are skipped silently.
    pub fn extract_route_info<R: RouteTable>(&self, app: &mut R) -> Vec<SubscriptionEntry> {
        let keys: Vec<RouteKey> = app.routes().iter().map(RouteRecord::key).collect();

        let mut found = Vec::new();
        for key in keys {
            let Some(descriptor) = app.subscription(&key) else {
                continue;
            };
            found.push(descriptor.entry_for(key.path.as_str()));

            if self.remove_dapr_data {
                app.detach_subscription(&key);
                debug!(route = %key, "Removed dapr data from route");
            }
        }

        let found_count = found.len();
        self.subscriptions.extend(found);

        info!(
            found = found_count,
            total = self.subscriptions.len(),
            remove_dapr_data = self.remove_dapr_data,
            "🔍 DISCOVERY: Extracted subscription routes"
        );

        self.subscriptions.snapshot()
    }

    /// Extract from `app`, then install `GET /dapr/subscribe` serving the
    /// registry.
    ///
    /// Extraction always runs, so calling this twice behaves like calling
    /// [`DaprDiscovery::extract_route_info`] twice. When `app` already has the
    /// discovery route, the existing one is kept and keeps serving.
    pub fn generate_subscribe_route<R: RouteTable>(
        &self,
        app: &mut R,
    ) -> Result<Vec<SubscriptionEntry>> {
        let entries = self.extract_route_info(app);
        let stats = self.subscriptions.stats();
        let details = format!(
            "{} subscriptions across {} pubsub components",
            stats.total_entries,
            stats.entries_per_pubsub.len()
        );

        if app.contains_route(&RouteKey::get(DISCOVERY_PATH)) {
            warn!(
                route = DISCOVERY_PATH,
                "Discovery route already installed, keeping the existing handler"
            );
            log_subscription_operation(
                "generate_subscribe_route",
                None,
                None,
                Some(DISCOVERY_PATH),
                "already_installed",
                Some(&details),
            );
            return Ok(entries);
        }

        app.add_route(
            RouteRecord::new(Method::GET, DISCOVERY_PATH),
            subscribe_route(self.subscriptions.clone()),
        )?;

        log_subscription_operation(
            "generate_subscribe_route",
            None,
            None,
            Some(DISCOVERY_PATH),
            "registered",
            Some(&details),
        );

        Ok(entries)
    }
}

//! # Subscription Router
//!
//! axum-backed [`RouteTable`]. Wraps an [`axum::Router`] and keeps, next to it,
//! the typed record of every route registered through it plus the subscription
//! side-table. Build it up at startup, then call [`SubscriptionRouter::into_router`]
//! to hand the finished router to the server.

use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{DaprError, Result};
use crate::subscription::SubscriptionDescriptor;
use crate::web::route_table::{validate_route_path, RouteKey, RouteRecord, RouteTable};

pub struct SubscriptionRouter<S = ()> {
    router: Router<S>,
    routes: Vec<RouteRecord>,
    subscriptions: HashMap<RouteKey, SubscriptionDescriptor>,
}

impl<S> SubscriptionRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            routes: Vec::new(),
            subscriptions: HashMap::new(),
        }
    }

    /// Register an ordinary `GET` route
    pub fn get<H, T>(&mut self, path: &str, handler: H) -> Result<()>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add_route(RouteRecord::new(Method::GET, path), get(handler))
    }

    /// Register an ordinary `POST` route
    pub fn post<H, T>(&mut self, path: &str, handler: H) -> Result<()>
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.add_route(RouteRecord::new(Method::POST, path), post(handler))
    }

    /// Fold another table into this one, subscriptions included. Routes of
    /// `other` keep their order and land after the existing ones.
    pub fn merge(mut self, other: SubscriptionRouter<S>) -> Result<Self> {
        if let Some(conflict) = other
            .routes
            .iter()
            .find(|route| self.conflicting_route(&route.key()).is_some())
        {
            return Err(DaprError::route_conflict(
                conflict.method.as_str(),
                conflict.path.as_str(),
            ));
        }

        self.router = self.router.merge(other.router);
        self.routes.extend(other.routes);
        self.subscriptions.extend(other.subscriptions);
        Ok(self)
    }

    pub fn router(&self) -> &Router<S> {
        &self.router
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }

    /// Number of routes currently carrying a descriptor
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl<S> Default for SubscriptionRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> RouteTable for SubscriptionRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    type State = S;

    fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    fn add_route(&mut self, record: RouteRecord, method_router: MethodRouter<S>) -> Result<()> {
        validate_route_path(&record.path)?;
        if self.conflicting_route(&record.key()).is_some() {
            return Err(DaprError::route_conflict(
                record.method.as_str(),
                record.path.as_str(),
            ));
        }

        debug!(method = %record.method, path = %record.path, "Adding route");

        self.router = std::mem::take(&mut self.router).route(&record.path, method_router);
        self.routes.push(record);
        Ok(())
    }

    fn attach_subscription(&mut self, key: RouteKey, descriptor: SubscriptionDescriptor) {
        self.subscriptions.insert(key, descriptor);
    }

    fn subscription(&self, key: &RouteKey) -> Option<&SubscriptionDescriptor> {
        self.subscriptions.get(key)
    }

    fn detach_subscription(&mut self, key: &RouteKey) -> Option<SubscriptionDescriptor> {
        self.subscriptions.remove(key)
    }
}

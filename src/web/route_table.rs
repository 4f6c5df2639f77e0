//! # Route Table Capability
//!
//! The registrar and the discovery aggregator only need two things from a
//! router: enumerate its routes, and accept a new one. [`RouteTable`] captures
//! that, plus the subscription side-table that maps a route's identity to its
//! [`SubscriptionDescriptor`]. Route records stay closed and typed; the
//! descriptor never travels through the free-form `extra` bag.

use axum::http::Method;
use axum::routing::MethodRouter;
use serde_json::{Map, Value};
use std::fmt;

use crate::constants::{params, DAPR_EXTRA_KEY};
use crate::error::{DaprError, Result};
use crate::subscription::SubscriptionDescriptor;

/// Identity of a route: one method on one path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// A registered route as the route table sees it
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub path: String,
    pub method: Method,
    pub tags: Vec<String>,
    /// Caller-supplied attributes carried alongside the route. Never holds the
    /// reserved `dapr` key.
    pub extra: Map<String, Value>,
}

impl RouteRecord {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            tags: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_extra(mut self, mut extra: Map<String, Value>) -> Self {
        extra.remove(DAPR_EXTRA_KEY);
        self.extra = extra;
        self
    }

    pub fn key(&self) -> RouteKey {
        RouteKey::new(self.method.clone(), self.path.clone())
    }
}

/// Router-like target that subscriptions are registered on and discovered from
pub trait RouteTable {
    /// Router state handed to every handler
    type State: Clone + Send + Sync + 'static;

    /// All routes in registration order
    fn routes(&self) -> &[RouteRecord];

    /// Register a route. Fails without mutating anything when the path is
    /// malformed or clashes with a registered route (see
    /// [`RouteTable::conflicting_route`]).
    fn add_route(
        &mut self,
        record: RouteRecord,
        method_router: MethodRouter<Self::State>,
    ) -> Result<()>;

    fn attach_subscription(&mut self, key: RouteKey, descriptor: SubscriptionDescriptor);

    fn subscription(&self, key: &RouteKey) -> Option<&SubscriptionDescriptor>;

    /// Remove and return the descriptor attached to `key`
    fn detach_subscription(&mut self, key: &RouteKey) -> Option<SubscriptionDescriptor>;

    fn contains_route(&self, key: &RouteKey) -> bool {
        self.routes()
            .iter()
            .any(|route| route.method == key.method && route.path == key.path)
    }

    /// The registered route that `key` would clash with in axum's matcher.
    ///
    /// The same method on the same path clashes. So does a path that differs
    /// from a registered one only in capture names (`/orders/{id}` against
    /// `/orders/{name}`), whatever the methods, since axum keys its matcher on
    /// the raw path string.
    fn conflicting_route(&self, key: &RouteKey) -> Option<&RouteRecord> {
        self.routes().iter().find(|route| {
            if route.path == key.path {
                route.method == key.method
            } else {
                paths_clash(&route.path, &key.path)
            }
        })
    }

    fn route(&self, key: &RouteKey) -> Option<&RouteRecord> {
        self.routes()
            .iter()
            .find(|route| route.method == key.method && route.path == key.path)
    }

    /// The route's extra attributes with the descriptor merged in under `dapr`.
    /// Returns `None` for unknown routes.
    fn extra_attributes(&self, key: &RouteKey) -> Option<Map<String, Value>> {
        let mut extra = self.route(key)?.extra.clone();
        if let Some(descriptor) = self.subscription(key) {
            extra.insert(DAPR_EXTRA_KEY.to_string(), descriptor.to_value());
        }
        Some(extra)
    }
}

/// Reject paths axum would refuse to route.
///
/// Captures must fill a whole segment (`{id}`, or `{*rest}` as the last
/// segment) and use a plain identifier as their name.
pub fn validate_route_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DaprError::type_mismatch("non-empty string", params::PATH));
    }
    if !path.starts_with('/') {
        return Err(DaprError::type_mismatch(
            "path starting with \"/\"",
            params::PATH,
        ));
    }

    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    for (index, segment) in segments.iter().enumerate() {
        let valid = match Segment::parse(segment) {
            Some(Segment::CatchAll) => index == last,
            Some(_) => true,
            None => false,
        };
        if !valid {
            return Err(DaprError::type_mismatch(
                "path with \"{capture}\" segments",
                params::PATH,
            ));
        }
    }
    Ok(())
}

/// One path segment as axum's matcher sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Static(&'a str),
    Capture,
    CatchAll,
}

impl<'a> Segment<'a> {
    /// `None` for anything axum would panic on
    fn parse(segment: &'a str) -> Option<Self> {
        // axum 0.8 rejects the old `:param` / `*rest` capture syntax
        if segment.starts_with(':') || segment.starts_with('*') {
            return None;
        }
        if !segment.contains(['{', '}']) {
            return Some(Segment::Static(segment));
        }

        let name = segment.strip_prefix('{')?.strip_suffix('}')?;
        let (name, kind) = match name.strip_prefix('*') {
            Some(name) => (name, Segment::CatchAll),
            None => (name, Segment::Capture),
        };
        let plain = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        plain.then_some(kind)
    }
}

/// Whether two distinct, valid paths would collide in axum's matcher.
///
/// Capture names are erased before comparing. A catch-all also collides with
/// a capture in the same position behind an identical prefix.
fn paths_clash(left: &str, right: &str) -> bool {
    let left: Vec<Option<Segment>> = left.split('/').map(Segment::parse).collect();
    let right: Vec<Option<Segment>> = right.split('/').map(Segment::parse).collect();

    for (a, b) in left.iter().zip(right.iter()) {
        match (a, b) {
            (Some(Segment::CatchAll), Some(Segment::Capture | Segment::CatchAll))
            | (Some(Segment::Capture), Some(Segment::CatchAll)) => return true,
            _ if a == b => continue,
            _ => return false,
        }
    }
    left.len() == right.len()
}

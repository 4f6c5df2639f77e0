//! # System Constants
//!
//! Reserved keys, well-known paths and environment variable names shared by the
//! registrar, the discovery aggregator and the settings loader.

/// Reserved key under which a route's subscription descriptor appears in its
/// extra-attributes view
pub const DAPR_EXTRA_KEY: &str = "dapr";

/// Well-known path the Dapr sidecar polls for programmatic subscriptions
pub const DISCOVERY_PATH: &str = "/dapr/subscribe";

/// Wire field names used by the Dapr subscription protocol
pub mod fields {
    pub const PUBSUB_NAME: &str = "pubsubname";
    pub const TOPIC: &str = "topic";
    pub const ROUTE: &str = "route";
    pub const METADATA: &str = "metadata";
    pub const DEAD_LETTER_TOPIC: &str = "deadLetterTopic";
}

/// Parameter names reported in validation errors
pub mod params {
    pub const SUBSCRIPTION: &str = "subscription";
    pub const PATH: &str = "path";
    pub const PUBSUB: &str = "pubsub";
    pub const TOPIC: &str = "topic";
    pub const TAGS: &str = "tags";
    pub const METADATA: &str = "metadata";
    pub const DEAD_LETTER_TOPIC: &str = "dead_letter_topic";
    pub const EXTRA: &str = "extra";
}

/// Environment variables consulted by settings and logging
pub mod env {
    pub const SETTINGS_PREFIX: &str = "DAPR_HELPER";
    pub const ENVIRONMENT: &str = "DAPR_HELPER_ENV";
    pub const APP_ENVIRONMENT: &str = "APP_ENV";
    pub const LOG_FORMAT: &str = "DAPR_HELPER_LOG_FORMAT";
    pub const SETTINGS_FILE: &str = "DAPR_HELPER_SETTINGS";
}

/// Default settings file looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "dapr-helper.toml";

/// Default listen address for the subscriber binary
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

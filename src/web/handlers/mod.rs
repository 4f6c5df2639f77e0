//! # Request Handlers
//!
//! HTTP handlers installed by this crate itself. Subscription handlers are the
//! caller's own and never live here.

pub mod discovery;

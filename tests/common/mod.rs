//! Shared helpers for the integration suites.
#![allow(dead_code)]

pub mod http;

pub use http::*;

use axum::Json;
use serde_json::{json, Value};

/// Handler shared by the integration suites
pub async fn test_endpoint() -> Json<Value> {
    Json(json!({"message": "test"}))
}

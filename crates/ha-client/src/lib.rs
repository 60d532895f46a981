//! Home Assistant REST client
//!
//! The agent only needs two calls from Home Assistant: the full state list
//! and service invocation. They are exposed through the [`HomeAssistantApi`]
//! trait so the HTTP layer can run against a fake in tests.

mod client;
mod error;

pub use client::HaClient;
pub use error::{ClientError, ClientResult};

use async_trait::async_trait;
use ha_core::EntityState;
use serde_json::Value;

/// State and service-call operations of a Home Assistant instance
#[async_trait]
pub trait HomeAssistantApi: Send + Sync {
    /// `GET /api/states` - every entity the instance knows about
    async fn get_states(&self) -> ClientResult<Vec<EntityState>>;

    /// `POST /api/services/{domain}/{service}` with `data` as the JSON body.
    ///
    /// Returns the decoded response, or `Value::Null` when the body is empty.
    async fn call_service(&self, domain: &str, service: &str, data: Value) -> ClientResult<Value>;
}

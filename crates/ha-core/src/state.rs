//! Entity state as reported by the Home Assistant REST API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of `GET /api/states`
///
/// Only `entity_id` is typed since helper filtering needs it. The state value
/// is kept as raw JSON and `attributes` stays absent when HA omits it, so an
/// odd entity neither fails the whole list nor changes shape on the way
/// through. Timestamps, context and anything a newer Home Assistant adds are
/// kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Raw entity id (not validated, HA is the source of truth)
    pub entity_id: String,

    /// The state value, normally a string ("on", "23.5", "unavailable")
    pub state: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

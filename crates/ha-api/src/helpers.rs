//! Input helper endpoints
//!
//! - `GET /api/helpers/list`
//! - `POST /api/helpers/create`
//! - `DELETE /api/helpers/delete/{entity_id}`
//!
//! All three forward to Home Assistant; create and delete record a commit
//! afterwards when commit logging is enabled.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use ha_core::{
    domain_of, is_helper_entity, EntityId, EntityState, HelperType, SERVICE_CREATE,
    SERVICE_DELETE,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{error, info, warn};

use crate::error::ApiError;
use crate::{ApiResponse, AppState};

/// Body of `POST /api/helpers/create`
///
/// ```json
/// {"type": "input_number", "config": {"name": "Target", "min": 0, "max": 30}}
/// ```
#[derive(Debug, Deserialize)]
pub struct HelperCreate {
    /// Helper domain, checked against [`HelperType`] by the handler so the
    /// client gets the list of valid values back
    #[serde(rename = "type")]
    pub helper_type: String,
    /// Passed to the `<type>.create` service unchanged; must contain `name`
    pub config: Map<String, Value>,
}

/// Body of `GET /api/helpers/list`
#[derive(Debug, Serialize)]
pub struct HelperList {
    pub success: bool,
    pub count: usize,
    pub helpers: Vec<EntityState>,
}

/// GET /api/helpers/list - every entity in a helper domain
pub async fn list_helpers(State(state): State<AppState>) -> Result<Json<HelperList>, ApiError> {
    let all_states = state.ha.get_states().await.map_err(|e| {
        error!("Failed to list helpers: {}", e);
        ApiError::from(e)
    })?;

    let helpers: Vec<EntityState> = all_states.into_iter().filter(is_helper_entity).collect();

    info!("Listed {} helpers", helpers.len());

    Ok(Json(HelperList {
        success: true,
        count: helpers.len(),
        helpers,
    }))
}

/// POST /api/helpers/create - create a helper through `<type>.create`
pub async fn create_helper(
    State(state): State<AppState>,
    body: Result<Json<HelperCreate>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    create(&state, body).await.map_err(|e| {
        error!("Failed to create helper: {}", e);
        e
    })
}

async fn create(
    state: &AppState,
    body: Result<Json<HelperCreate>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(helper) = body?;
    let helper_type: HelperType = helper
        .helper_type
        .parse()
        .map_err(|e: ha_core::InvalidHelperType| ApiError::BadRequest(e.to_string()))?;

    let name = match helper.config.get("name") {
        Some(name) => display_value(name),
        None => {
            return Err(ApiError::BadRequest(
                "config must include 'name' field".to_string(),
            ))
        }
    };

    let result = state
        .ha
        .call_service(
            helper_type.domain(),
            SERVICE_CREATE,
            Value::Object(helper.config),
        )
        .await?;

    // HA only reports the new entity when the service returns an object
    let entity_id = result
        .get("entity_id")
        .and_then(Value::as_str)
        .and_then(|id| id.parse::<EntityId>().ok());

    if let Some(ref entity_id) = entity_id {
        record(state, &format!("Create helper: {}", entity_id)).await;
    }

    info!("Created helper: {} - {}", helper_type, name);

    Ok(Json(ApiResponse {
        success: true,
        message: format!("Helper created: {}", helper_type),
        data: Some(result),
    }))
}

/// DELETE /api/helpers/delete/{entity_id} - delete a helper through `<domain>.delete`
///
/// The domain is taken from the id as given; Home Assistant decides whether
/// the entity and the service exist.
pub async fn delete_helper(
    State(state): State<AppState>,
    Path(entity_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    let domain = domain_of(&entity_id);

    state
        .ha
        .call_service(domain, SERVICE_DELETE, json!({ "entity_id": entity_id }))
        .await
        .map_err(|e| {
            error!("Failed to delete helper: {}", e);
            ApiError::from(e)
        })?;

    record(&state, &format!("Delete helper: {}", entity_id)).await;

    info!("Deleted helper: {}", entity_id);

    Ok(Json(ApiResponse {
        success: true,
        message: format!("Helper deleted: {}", entity_id),
        data: None,
    }))
}

/// Record a commit if enabled. The mutation already happened in Home
/// Assistant, so a failed commit is only logged.
async fn record(state: &AppState, message: &str) {
    if !state.git.enabled() {
        return;
    }
    if let Err(e) = state.git.commit_changes(message).await {
        warn!("Failed to commit '{}': {}", message, e);
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

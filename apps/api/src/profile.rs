use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::{non_null_fields, Collection};

/// Editable profile fields. Absent or null fields leave the stored value alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub qualification: Option<String>,
    pub role: Option<String>,
    pub about: Option<String>,
    pub photo_url: Option<String>,
    pub resume_url: Option<String>,
}

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let doc = state.store.get(Collection::Users, &user.uid).await?;
    Ok(Json(doc.map(|d| d.data).unwrap_or_else(|| json!({}))))
}

/// PUT /api/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(profile): Json<Profile>,
) -> Result<Json<Value>, AppError> {
    let patch = non_null_fields(
        serde_json::to_value(&profile).map_err(|e| AppError::Internal(e.into()))?,
    );
    state
        .store
        .merge(Collection::Users, &user.uid, patch)
        .await?;
    Ok(Json(json!({ "ok": true })))
}

//! Group REST endpoints (read-only)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use bunch_users::{Group, GroupId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::API_ROOT;
use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

pub const RESOURCE: &str = "group";

pub fn group_url(id: GroupId) -> String {
    format!("{API_ROOT}/{RESOURCE}/{id}")
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupResponse {
    pub url: String,
    #[schema(value_type = i64)]
    pub id: GroupId,
    pub name: String,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            url: group_url(group.id),
            id: group.id,
            name: group.name,
        }
    }
}

/// Create group routes
pub fn create_group_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(&format!("{API_ROOT}/{RESOURCE}"), get(list_groups))
        .route(&format!("{API_ROOT}/{RESOURCE}/:id"), get(get_group))
}

#[utoipa::path(
    get,
    path = "/api/group",
    tag = "Groups",
    responses(
        (status = 200, description = "All groups ordered by name", body = Vec<GroupResponse>),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_groups(
    State(state): State<Arc<GatewayState>>,
) -> GatewayResult<Json<Vec<GroupResponse>>> {
    let groups = state.groups.list().await?;
    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/group/{id}",
    tag = "Groups",
    params(("id" = i64, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group details", body = GroupResponse),
        (status = 404, description = "Group not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_group(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> GatewayResult<Json<GroupResponse>> {
    let not_found = || GatewayError::NotFound("Group not found".to_string());

    let id: GroupId = id.parse().map_err(|_| not_found())?;
    let group = state.groups.find_by_id(id).await?.ok_or_else(not_found)?;

    Ok(Json(group.into()))
}

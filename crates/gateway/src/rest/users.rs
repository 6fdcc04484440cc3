//! Account REST endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bunch_config::MediaConfig;
use bunch_users::{
    Account, AccountChanges, AccountQuery, Color, Group, NewAccount, Profile, ThemePreference,
    UserError, UserResult,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{groups, API_ROOT};
use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

pub const RESOURCE: &str = "user";

pub fn account_url(id: Uuid) -> String {
    format!("{API_ROOT}/{RESOURCE}/{id}")
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub url: String,
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Media URL of the avatar image
    pub avatar: Option<String>,
    pub status: Option<String>,
    pub bio: Option<String>,
    pub theme_preference: String,
    /// Hex code of the accent color
    pub color: Option<String>,
    pub pronoun: Option<String>,
    /// URLs of the groups the account belongs to
    pub groups: Vec<String>,
}

impl AccountResponse {
    pub fn new(account: Account, groups: &[Group], media: &MediaConfig) -> Self {
        let Account {
            id,
            identity,
            profile,
        } = account;

        Self {
            url: account_url(id),
            id: id.to_string(),
            email: identity.email,
            username: identity.username,
            first_name: identity.first_name,
            last_name: identity.last_name,
            is_active: identity.is_active,
            is_staff: identity.is_staff,
            is_superuser: identity.is_superuser,
            avatar: profile.avatar.as_deref().map(|path| media.resolve(path)),
            status: profile.status,
            bio: profile.bio,
            theme_preference: profile.theme_preference.to_string(),
            color: profile.color.map(|color| color.to_string()),
            pronoun: profile.pronoun,
            groups: groups.iter().map(|group| groups::group_url(group.id)).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsQuery {
    /// Matched against email, names, username, bio and status
    pub search: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<ListAccountsQuery> for AccountQuery {
    fn from(query: ListAccountsQuery) -> Self {
        AccountQuery {
            search: query.search,
            is_staff: query.is_staff,
            is_active: query.is_active,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Left empty, the account gets an unusable password
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    pub avatar: Option<String>,
    pub status: Option<String>,
    pub bio: Option<String>,
    pub theme_preference: Option<String>,
    pub color: Option<String>,
    pub pronoun: Option<String>,
}

impl CreateAccountRequest {
    fn into_new_account(self, media: &MediaConfig) -> UserResult<NewAccount> {
        let profile = Profile {
            avatar: self.avatar.map(|name| media.avatar_reference(&name)),
            status: self.status,
            bio: self.bio,
            theme_preference: parse_theme(self.theme_preference)?.unwrap_or_default(),
            color: parse_color(self.color)?,
            pronoun: self.pronoun,
        };

        Ok(NewAccount {
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            profile,
        })
    }
}

/// Fields to change; absent fields are left as they are
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub avatar: Option<String>,
    pub status: Option<String>,
    pub bio: Option<String>,
    pub theme_preference: Option<String>,
    pub color: Option<String>,
    pub pronoun: Option<String>,
}

impl UpdateAccountRequest {
    fn into_changes(self, media: &MediaConfig) -> UserResult<AccountChanges> {
        Ok(AccountChanges {
            email: self.email,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            avatar: self.avatar.map(|name| media.avatar_reference(&name)),
            status: self.status,
            bio: self.bio,
            theme_preference: parse_theme(self.theme_preference)?,
            color: parse_color(self.color)?,
            pronoun: self.pronoun,
        })
    }
}

fn parse_theme(value: Option<String>) -> UserResult<Option<ThemePreference>> {
    value.as_deref().map(str::parse).transpose()
}

fn parse_color(value: Option<String>) -> UserResult<Option<Color>> {
    value.as_deref().map(str::parse).transpose()
}

/// Create account routes
pub fn create_account_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            &format!("{API_ROOT}/{RESOURCE}"),
            get(list_accounts).post(create_account),
        )
        .route(
            &format!("{API_ROOT}/{RESOURCE}/:id"),
            get(get_account).put(update_account).patch(patch_account),
        )
}

async fn render(state: &GatewayState, account: Account) -> GatewayResult<AccountResponse> {
    let groups = state.groups.list_for_account(account.id).await?;
    Ok(AccountResponse::new(account, &groups, &state.media))
}

fn parse_id(id: &str) -> GatewayResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| GatewayError::from(UserError::NotFound))
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Accounts",
    params(ListAccountsQuery),
    responses(
        (status = 200, description = "Accounts ordered by join date", body = Vec<AccountResponse>),
        (status = 500, description = "Internal server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_accounts(
    State(state): State<Arc<GatewayState>>,
    Query(params): Query<ListAccountsQuery>,
) -> GatewayResult<Json<Vec<AccountResponse>>> {
    let accounts = state
        .account_service
        .list_accounts(&AccountQuery::from(params))
        .await?;

    let mut responses = Vec::with_capacity(accounts.len());
    for account in accounts {
        responses.push(render(&state, account).await?);
    }

    Ok(Json(responses))
}

#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Missing or invalid field", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or username already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_account(
    State(state): State<Arc<GatewayState>>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> GatewayResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let request = payload.into_new_account(&state.media)?;
    let account = state.account_service.create_account(request).await?;

    let response = render(&state, account).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 404, description = "Account not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_account(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
) -> GatewayResult<Json<AccountResponse>> {
    let account = state.account_service.get_account(parse_id(&id)?).await?;
    Ok(Json(render(&state, account).await?))
}

#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account replaced", body = AccountResponse),
        (status = 400, description = "Missing or invalid field", body = crate::error::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or username already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_account(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> GatewayResult<Json<AccountResponse>> {
    let Json(payload) = payload?;
    if payload.email.is_none() {
        return Err(UserError::required("email", "Email is required.").into());
    }
    if payload.username.is_none() {
        return Err(UserError::required("username", "The given username must be set.").into());
    }

    apply_changes(&state, &id, payload).await
}

#[utoipa::path(
    patch,
    path = "/api/user/{id}",
    tag = "Accounts",
    params(("id" = String, Path, description = "Account id")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 400, description = "Invalid field", body = crate::error::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or username already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_account(
    State(state): State<Arc<GatewayState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> GatewayResult<Json<AccountResponse>> {
    let Json(payload) = payload?;
    apply_changes(&state, &id, payload).await
}

async fn apply_changes(
    state: &GatewayState,
    id: &str,
    payload: UpdateAccountRequest,
) -> GatewayResult<Json<AccountResponse>> {
    let id = parse_id(id)?;
    let changes = payload.into_changes(&state.media)?;
    let account = state.account_service.update_account(id, changes).await?;

    Ok(Json(render(state, account).await?))
}

//! Request handlers for the delegated-authorization API.
//!
//! One handler per [`Action`]. Handlers stay thin: extract typed path
//! parameters, dispatch into the backend, wrap the result in the wire
//! envelope. Collection responses carry a `links.self` built back from
//! the route template that matched.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::backend::{AccessToken, DelegatedRole};
use crate::discovery::document;
use crate::routing::Action;

#[derive(Deserialize)]
pub struct UserPath {
    user_id: String,
}

#[derive(Deserialize)]
pub struct TokenPath {
    user_id: String,
    access_token_id: String,
}

#[derive(Deserialize)]
pub struct RolePath {
    user_id: String,
    access_token_id: String,
    role_id: String,
}

#[derive(Serialize)]
struct CollectionLinks {
    #[serde(rename = "self")]
    self_link: Option<String>,
    previous: Option<String>,
    next: Option<String>,
}

#[derive(Serialize)]
struct AccessTokenList {
    access_tokens: Vec<AccessToken>,
    links: CollectionLinks,
}

#[derive(Serialize)]
struct AccessTokenItem {
    access_token: AccessToken,
}

#[derive(Serialize)]
struct RoleList {
    roles: Vec<DelegatedRole>,
    links: CollectionLinks,
}

#[derive(Serialize)]
struct RoleItem {
    role: DelegatedRole,
}

/// `links.self` for a collection: the matched template filled back in
/// with the request's path variables, under the mount prefix.
fn collection_links(state: &AppState, action: Action, vars: &[(&str, &str)]) -> CollectionLinks {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    let self_link = state
        .table
        .entry_for(action)
        .and_then(|entry| entry.template().fill(&map))
        .map(|path| format!("{}{path}", state.prefix));
    CollectionLinks {
        self_link,
        previous: None,
        next: None,
    }
}

pub async fn list_access_tokens(
    State(state): State<AppState>,
    Path(path): Path<UserPath>,
) -> Result<Json<impl Serialize>, ApiError> {
    let access_tokens = state.backend.list_access_tokens(&path.user_id).await?;
    tracing::debug!(
        user_id = %path.user_id,
        count = access_tokens.len(),
        "Listed access tokens"
    );
    Ok(Json(AccessTokenList {
        access_tokens,
        links: collection_links(
            &state,
            Action::ListAccessTokens,
            &[("user_id", path.user_id.as_str())],
        ),
    }))
}

pub async fn get_access_token(
    State(state): State<AppState>,
    Path(path): Path<TokenPath>,
) -> Result<Json<impl Serialize>, ApiError> {
    let access_token = state
        .backend
        .get_access_token(&path.user_id, &path.access_token_id)
        .await?;
    Ok(Json(AccessTokenItem { access_token }))
}

pub async fn delete_access_token(
    State(state): State<AppState>,
    Path(path): Path<TokenPath>,
) -> Result<StatusCode, ApiError> {
    state
        .backend
        .delete_access_token(&path.user_id, &path.access_token_id)
        .await?;
    tracing::info!(
        user_id = %path.user_id,
        access_token_id = %path.access_token_id,
        "Access token revoked"
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_access_token_roles(
    State(state): State<AppState>,
    Path(path): Path<TokenPath>,
) -> Result<Json<impl Serialize>, ApiError> {
    let roles = state
        .backend
        .list_access_token_roles(&path.user_id, &path.access_token_id)
        .await?;
    Ok(Json(RoleList {
        roles,
        links: collection_links(
            &state,
            Action::ListAccessTokenRoles,
            &[
                ("user_id", path.user_id.as_str()),
                ("access_token_id", path.access_token_id.as_str()),
            ],
        ),
    }))
}

pub async fn get_access_token_role(
    State(state): State<AppState>,
    Path(path): Path<RolePath>,
) -> Result<Json<impl Serialize>, ApiError> {
    let role = state
        .backend
        .get_access_token_role(&path.user_id, &path.access_token_id, &path.role_id)
        .await?;
    Ok(Json(RoleItem { role }))
}

/// Serve the home document rendered at startup, byte-identical for the
/// process lifetime.
pub async fn home_document(State(state): State<AppState>) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static(document::MEDIA_TYPE),
        )],
        state.home_body.to_string(),
    )
        .into_response()
}

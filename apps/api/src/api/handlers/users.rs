use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::errors::ApiError;
use crate::api::extractors::{ApiJson, ApiPath};
use crate::api::{AppState, USERS_PATH};
use crate::domain::repositories::UserStore;
use crate::service::UserDto;

/// A hypermedia link
#[derive(Debug, Serialize)]
pub struct Link {
    pub href: String,
}

/// Links attached to a single-user response
#[derive(Debug, Serialize)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub users: Link,
}

/// Response for a single user: the user fields plus `_links`
#[derive(Debug, Serialize)]
pub struct UserModel {
    #[serde(flatten)]
    pub user: UserDto,
    #[serde(rename = "_links")]
    pub links: UserLinks,
}

impl UserModel {
    fn new(user: UserDto, id: i32, base_url: &str) -> Self {
        let collection = format!("{}{}", base_url, USERS_PATH);
        Self {
            user,
            links: UserLinks {
                self_link: Link {
                    href: format!("{}/{}", collection, id),
                },
                users: Link { href: collection },
            },
        }
    }
}

/// List all users
///
/// GET /api/users
pub async fn get_users<S: UserStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.users.find_all_users().await?;
    Ok(Json(users))
}

/// Get a user by ID
///
/// GET /api/users/:id
pub async fn get_user_by_id<S: UserStore>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<UserModel>, ApiError> {
    let user = state.users.find_user_by_id(id).await?;
    Ok(Json(UserModel::new(user, id, &state.base_url)))
}

/// Create a new user
///
/// POST /api/users
pub async fn create_user<S: UserStore>(
    State(state): State<AppState<S>>,
    ApiJson(req): ApiJson<UserDto>,
) -> Result<Json<UserDto>, ApiError> {
    let created = state.users.create_user(req).await?;
    Ok(Json(created))
}

/// Replace a user's fields
///
/// PUT /api/users/:id
pub async fn update_user<S: UserStore>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<UserDto>,
) -> Result<Json<UserDto>, ApiError> {
    let updated = state.users.update_user(id, req).await?;
    Ok(Json(updated))
}

/// Delete a user
///
/// DELETE /api/users/:id
pub async fn delete_user_by_id<S: UserStore>(
    State(state): State<AppState<S>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, ApiError> {
    state.users.delete_user_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

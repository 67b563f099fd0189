// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod extractors;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::repositories::UserStore;
use crate::service::UserService;
use handlers::{health, users};

/// Collection path of the users resource
pub const USERS_PATH: &str = "/api/users";

/// Shared state handed to every handler
pub struct AppState<S> {
    pub users: Arc<UserService<S>>,
    /// Prefix for generated links; empty yields relative hrefs
    pub base_url: Arc<str>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            base_url: Arc::clone(&self.base_url),
        }
    }
}

impl<S: UserStore> AppState<S> {
    pub fn new(service: UserService<S>, base_url: &str) -> Self {
        Self {
            users: Arc::new(service),
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }
}

/// Build the application router
pub fn router<S: UserStore>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // User routes
        .route(
            USERS_PATH,
            get(users::get_users::<S>).post(users::create_user::<S>),
        )
        .route(
            "/api/users/:id",
            get(users::get_user_by_id::<S>)
                .put(users::update_user::<S>)
                .delete(users::delete_user_by_id::<S>),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}

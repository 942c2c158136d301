//! FieldOps Server — HTTP surface.
//!
//! The router is exposed as a library function so integration tests
//! can drive the full pipeline with `tower::ServiceExt::oneshot`
//! against an in-memory database.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/auth/logout-all", post(handlers::auth::logout_all))
        .route("/api/v1/tenants", post(handlers::tenants::signup))
        .route(
            "/api/v1/tenants/current",
            get(handlers::tenants::current).patch(handlers::tenants::update_current),
        )
        .route(
            "/api/v1/tenants/current/quota",
            get(handlers::tenants::quota).put(handlers::tenants::set_quota),
        )
        .route(
            "/api/v1/users",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/api/v1/users/{id}",
            get(handlers::users::get)
                .patch(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/api/v1/users/{id}/roles",
            get(handlers::users::list_roles).post(handlers::users::assign_role),
        )
        .route(
            "/api/v1/users/{id}/roles/{role_id}",
            delete(handlers::users::unassign_role),
        )
        .route(
            "/api/v1/users/{id}/signatures",
            get(handlers::users::list_signatures).post(handlers::users::create_signature),
        )
        .route("/api/v1/roles", get(handlers::roles::list))
        .route(
            "/api/v1/workers",
            get(handlers::workers::list).post(handlers::workers::create),
        )
        .route(
            "/api/v1/workers/{id}",
            get(handlers::workers::get)
                .patch(handlers::workers::update)
                .delete(handlers::workers::delete),
        )
        .route(
            "/api/v1/jobs",
            get(handlers::jobs::list).post(handlers::jobs::create),
        )
        .route(
            "/api/v1/jobs/{id}",
            get(handlers::jobs::get)
                .patch(handlers::jobs::update)
                .delete(handlers::jobs::delete),
        )
        .route(
            "/api/v1/jobs/{id}/assignments",
            get(handlers::jobs::list_assignments).post(handlers::jobs::create_assignment),
        )
        .route(
            "/api/v1/jobs/{id}/assignments/{assignment_id}",
            delete(handlers::jobs::delete_assignment),
        )
        .route(
            "/api/v1/assets",
            get(handlers::assets::list).post(handlers::assets::create),
        )
        .route(
            "/api/v1/assets/{id}",
            get(handlers::assets::get)
                .patch(handlers::assets::update)
                .delete(handlers::assets::delete),
        )
        .route("/api/v1/audit", get(handlers::audit::list))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

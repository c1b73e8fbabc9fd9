//! HTTP surface: admin JSON API, public localized reads, server bootstrap.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod public;
pub mod state;

pub use state::ApiState;

use std::net::SocketAddr;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use tracing::info;

use crate::application::error::ErrorReport;
use crate::infra::error::InfraError;

pub fn build_admin_router(state: ApiState) -> Router {
    let auth_state = state.clone();

    Router::new()
        .route(
            "/api/v1/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/v1/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/api/v1/posts/{id}/status", patch(handlers::update_post_status))
        .route(
            "/api/v1/news",
            get(handlers::list_news).post(handlers::create_news),
        )
        .route(
            "/api/v1/news/{id}",
            get(handlers::get_news)
                .put(handlers::update_news)
                .delete(handlers::delete_news),
        )
        .route("/api/v1/news/{id}/status", patch(handlers::update_news_status))
        .route(
            "/api/v1/services",
            get(handlers::list_services).post(handlers::create_service),
        )
        .route(
            "/api/v1/services/{id}",
            get(handlers::get_service)
                .put(handlers::update_service)
                .delete(handlers::delete_service),
        )
        .route(
            "/api/v1/services/{id}/status",
            patch(handlers::update_service_status),
        )
        .route(
            "/api/v1/team",
            get(handlers::list_team).post(handlers::create_team_member),
        )
        .route(
            "/api/v1/team/{id}",
            get(handlers::get_team_member)
                .put(handlers::update_team_member)
                .delete(handlers::delete_team_member),
        )
        .route(
            "/api/v1/banners",
            get(handlers::list_banners).post(handlers::create_banner),
        )
        .route(
            "/api/v1/banners/{id}",
            get(handlers::get_banner)
                .put(handlers::update_banner)
                .delete(handlers::delete_banner),
        )
        .route(
            "/api/v1/contact",
            get(handlers::get_contact).post(handlers::create_contact),
        )
        .route("/api/v1/contact/{id}", axum::routing::put(handlers::update_contact))
        .route(
            "/api/v1/media",
            get(handlers::list_media).post(handlers::upload_media),
        )
        .route(
            "/api/v1/media/{id}",
            get(handlers::get_media).delete(handlers::delete_media),
        )
        .route(
            "/api/v1/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/v1/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/v1/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/v1/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/api/v1/audit", get(handlers::list_audit_logs))
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::require_auth,
        ))
        .with_state(state)
}

pub fn build_public_router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/public/posts", get(public::list_posts))
        .route("/public/posts/{slug}", get(public::get_post))
        .route("/public/news", get(public::list_news))
        .route("/public/news/{slug}", get(public::get_news))
        .route("/public/services", get(public::list_services))
        .route("/public/services/{slug}", get(public::get_service))
        .route("/public/team", get(public::list_team))
        .route("/public/banners/{slot}", get(public::get_banner))
        .route("/public/contact", get(public::get_contact))
        .with_state(state)
}

/// Full application router with shared response logging.
pub fn build_router(state: ApiState) -> Router {
    build_public_router(state.clone())
        .merge(build_admin_router(state))
        .layer(axum_middleware::from_fn(middleware::log_responses))
}

async fn healthz(State(state): State<ApiState>) -> Response {
    match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => StatusCode::NO_CONTENT.into_response(),
            Err(err) => {
                let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
                ErrorReport::from_error(
                    "infra::http::healthz",
                    StatusCode::SERVICE_UNAVAILABLE,
                    &err,
                )
                .attach(&mut response);
                response
            }
        },
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Bind and serve until a shutdown signal arrives, then drain gracefully.
pub async fn serve(router: Router, addr: SocketAddr) -> Result<(), InfraError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "http server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("http server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}

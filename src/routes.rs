use crate::auth::{self, handlers as auth_handlers};
use crate::config::SessionLayer;
use crate::handlers;
use crate::middleware::add_security_headers;
use crate::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// Assembles the whole HTTP API. Guards run after the session layer, so
/// every guarded route sees the session of the request.
pub fn build_router(state: AppState, session_layer: SessionLayer) -> Router {
    let user_routes = Router::new()
        .route("/api/auth/me", get(auth_handlers::me_handler))
        .route("/api/anuncios/mine", get(handlers::my_listings_handler))
        .route("/api/anuncios/create", post(handlers::create_listing_handler))
        .route("/api/anuncios/update", put(handlers::update_listing_handler))
        .route("/api/anuncios/delete", delete(handlers::delete_listing_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_user,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/me", get(auth_handlers::admin_me_handler))
        .route(
            "/api/admin/anuncios",
            get(handlers::admin_list_listings_handler)
                .put(handlers::admin_update_listing_status_handler),
        )
        .route(
            "/api/admin/users",
            get(handlers::admin_list_users_handler).delete(handlers::admin_delete_user_handler),
        )
        .route("/api/admin/dashboard", get(handlers::admin_dashboard_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/auth/register", post(auth_handlers::register_handler))
        .route("/api/auth/login", post(auth_handlers::login_handler))
        .route("/api/auth/logout", post(auth_handlers::logout_handler))
        .route("/api/admin/login", post(auth_handlers::admin_login_handler))
        .route("/api/admin/logout", post(auth_handlers::logout_handler))
        .route("/api/anuncios/list", get(handlers::list_listings_handler))
        .route("/api/anuncios/{id}", get(handlers::get_listing_handler))
        .merge(user_routes)
        .merge(admin_routes)
        .layer(session_layer)
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use crate::auth::session::{ADMIN_ID_KEY, USER_ID_KEY};
use crate::error::AppError;
use crate::models::{admin::Admin, user::User};
use crate::services::AuthServiceError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::warn;

/// Advertiser resolved from the session by [`require_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Administrator resolved from the session by [`require_admin`].
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

pub async fn require_user(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match session.get::<i64>(USER_ID_KEY).await {
        Ok(Some(id)) => id,
        Ok(None) => return AppError::Unauthorized.into_response(),
        Err(e) => return AppError::from(e).into_response(),
    };

    match state.auth_service.get_user_by_id(user_id).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(AuthServiceError::UserNotFound) => {
            // Account deleted while the session was alive.
            warn!(user_id, "Session refers to a missing user; flushing");
            let _ = session.flush().await;
            AppError::Unauthorized.into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let admin_id = match session.get::<i64>(ADMIN_ID_KEY).await {
        Ok(Some(id)) => id,
        Ok(None) => return AppError::Unauthorized.into_response(),
        Err(e) => return AppError::from(e).into_response(),
    };

    match state.auth_service.get_admin_by_id(admin_id).await {
        Ok(admin) => {
            request.extensions_mut().insert(CurrentAdmin(admin));
            next.run(request).await
        }
        Err(AuthServiceError::AdminNotFound) => {
            warn!(admin_id, "Session refers to a missing admin; flushing");
            let _ = session.flush().await;
            AppError::Unauthorized.into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

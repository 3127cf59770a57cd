use crate::auth::middleware::{CurrentAdmin, CurrentUser};
use crate::auth::session::{end_session, start_admin_session, start_user_session};
use crate::error::{AppError, Result};
use crate::models::{admin::AdminResponse, user::UserResponse};
use crate::services::{AdminLoginRequest, AuthServiceError, CreateUserRequest, LoginRequest};
use crate::validation::required;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, warn};

#[derive(Deserialize)]
pub struct RegisterPayload {
    #[serde(rename = "nome")]
    name: Option<String>,
    email: Option<String>,
    #[serde(rename = "senha")]
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    email: Option<String>,
    #[serde(rename = "senha")]
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct AdminLoginPayload {
    #[serde(rename = "usuario")]
    username: Option<String>,
    #[serde(rename = "senha")]
    password: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// POST /api/auth/register
pub async fn register_handler(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;

    let request = CreateUserRequest {
        name: payload.name.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        password: payload.password.unwrap_or_default(),
    };

    let user = app_state.user_service.create_user(request).await?;
    info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/auth/login
pub async fn login_handler(
    State(app_state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<LoginPayload>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(payload) = payload?;

    let (email, password) = match (
        required(payload.email.as_deref()),
        non_empty(payload.password),
    ) {
        (Some(email), Some(password)) => (email.to_string(), password),
        _ => {
            return Err(AppError::Validation(
                "Email e senha são obrigatórios".to_string(),
            ))
        }
    };

    match app_state
        .auth_service
        .authenticate(LoginRequest { email, password })
        .await
    {
        Ok(user) => {
            start_user_session(&session, user.id).await?;
            info!(user_id = user.id, "User logged in");
            Ok(Json(UserResponse::from(user)))
        }
        Err(AuthServiceError::InvalidCredentials) => {
            warn!("Failed user login attempt");
            Err(AppError::InvalidCredentials(
                "Email ou senha incorretos".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/auth/me
pub async fn me_handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// POST /api/auth/logout and /api/admin/logout
pub async fn logout_handler(session: Session) -> Result<impl IntoResponse> {
    end_session(&session).await?;
    Ok(Json(json!({ "message": "Sessão encerrada" })))
}

/// POST /api/admin/login
pub async fn admin_login_handler(
    State(app_state): State<AppState>,
    session: Session,
    payload: std::result::Result<Json<AdminLoginPayload>, JsonRejection>,
) -> Result<Json<AdminResponse>> {
    let Json(payload) = payload?;

    let (username, password) = match (
        required(payload.username.as_deref()),
        non_empty(payload.password),
    ) {
        (Some(username), Some(password)) => (username.to_string(), password),
        _ => {
            return Err(AppError::Validation(
                "Usuário e senha são obrigatórios".to_string(),
            ))
        }
    };

    match app_state
        .auth_service
        .authenticate_admin(AdminLoginRequest { username, password })
        .await
    {
        Ok(admin) => {
            start_admin_session(&session, admin.id).await?;
            info!(admin_id = admin.id, "Admin logged in");
            Ok(Json(AdminResponse::from(admin)))
        }
        Err(AuthServiceError::InvalidCredentials) => {
            warn!("Failed admin login attempt");
            Err(AppError::InvalidCredentials(
                "Usuário ou senha incorretos".to_string(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /api/admin/me
pub async fn admin_me_handler(
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
) -> Json<AdminResponse> {
    Json(AdminResponse::from(admin))
}

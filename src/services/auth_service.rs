use crate::auth::password::verify_password;
use crate::models::{admin::Admin, user::User};
use crate::repositories::{AdminRepository, RepositoryError, UserRepository};
use crate::validation::normalize_email;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Admin not found")]
    AdminNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// Credential checks for both account tables. Unknown account and wrong
/// password are indistinguishable to the caller.
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    admin_repository: Arc<dyn AdminRepository>,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        admin_repository: Arc<dyn AdminRepository>,
    ) -> Self {
        Self {
            user_repository,
            admin_repository,
        }
    }

    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn authenticate_admin(
        &self,
        request: AdminLoginRequest,
    ) -> Result<Admin, AuthServiceError> {
        let admin = self
            .admin_repository
            .find_by_username(request.username.trim())
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&request.password, &admin.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(admin)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, AuthServiceError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)
    }

    pub async fn get_admin_by_id(&self, admin_id: i64) -> Result<Admin, AuthServiceError> {
        self.admin_repository
            .find_by_id(admin_id)
            .await?
            .ok_or(AuthServiceError::AdminNotFound)
    }
}

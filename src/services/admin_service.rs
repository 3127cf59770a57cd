use crate::auth::password::hash_password;
use crate::models::admin::Admin;
use crate::repositories::{AdminRepository, RepositoryError};
use crate::validation::MIN_PASSWORD_LENGTH;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    #[error("Username must not be empty")]
    InvalidUsername,
    #[error("Password too weak (minimum 8 characters)")]
    WeakPassword,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Admin not found")]
    AdminNotFound,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Management of moderation accounts. Only reachable from the CLI.
pub struct AdminService {
    repository: Arc<dyn AdminRepository>,
}

impl AdminService {
    pub fn new(repository: Arc<dyn AdminRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Admin, AdminServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AdminServiceError::InvalidUsername);
        }
        let password_hash = self.hash(password)?;

        match self.repository.create_admin(username, &password_hash).await {
            Ok(admin) => Ok(admin),
            Err(RepositoryError::AlreadyExists) => Err(AdminServiceError::UsernameTaken),
            Err(e) => Err(AdminServiceError::RepositoryError(e)),
        }
    }

    /// Returns the existing admin, or creates it. The flag is true when a new
    /// account was inserted.
    pub async fn ensure_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Admin, bool), AdminServiceError> {
        if let Some(admin) = self.repository.find_by_username(username.trim()).await? {
            return Ok((admin, false));
        }
        let admin = self.create_admin(username, password).await?;
        Ok((admin, true))
    }

    pub async fn set_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(), AdminServiceError> {
        let admin = self
            .repository
            .find_by_username(username.trim())
            .await?
            .ok_or(AdminServiceError::AdminNotFound)?;
        let password_hash = self.hash(password)?;

        self.repository
            .update_password(admin.id, &password_hash)
            .await?;
        Ok(())
    }

    fn hash(&self, password: &str) -> Result<String, AdminServiceError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AdminServiceError::WeakPassword);
        }
        hash_password(password).map_err(|e| AdminServiceError::HashingError(e.to_string()))
    }
}

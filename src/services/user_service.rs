use crate::auth::password::{hash_password, verify_password};
use crate::models::user::{User, UserSummary};
use crate::repositories::{RepositoryError, UserRepository};
use crate::validation::{is_valid_email, normalize_email, MIN_PASSWORD_LENGTH};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Todos os campos são obrigatórios")]
    MissingFields,
    #[error("Email inválido")]
    InvalidEmail,
    #[error("A senha deve ter pelo menos 8 caracteres")]
    WeakPassword,
    #[error("Usuário não encontrado")]
    UserNotFound,
    #[error("Email já cadastrado")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct UpdatePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Registers an advertiser. A duplicate email never creates a row.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        let name = request.name.trim();
        let email = normalize_email(&request.email);

        if name.is_empty() || email.is_empty() || request.password.is_empty() {
            return Err(UserServiceError::MissingFields);
        }

        if !is_valid_email(&email) {
            return Err(UserServiceError::InvalidEmail);
        }

        self.validate_password(&request.password)?;

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| UserServiceError::HashingError(e.to_string()))?;

        // The unique index still guards a concurrent registration.
        match self
            .repository
            .create_user(name, &email, &password_hash)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self
            .repository
            .find_by_email(&normalize_email(email))
            .await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Users with their listing counts, newest first.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, UserServiceError> {
        let rows = self.repository.list_with_listing_counts().await?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    pub async fn count_users(&self) -> Result<i64, UserServiceError> {
        Ok(self.repository.count_users().await?)
    }

    /// Deletes the user together with all of its listings. Returns how many
    /// listings were removed.
    pub async fn delete_user(&self, id: i64) -> Result<u64, UserServiceError> {
        match self.repository.delete_user(id).await {
            Ok(removed) => Ok(removed),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<(), UserServiceError> {
        self.validate_password(&request.new_password)?;

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| UserServiceError::HashingError(e.to_string()))?;

        match self
            .repository
            .update_password(request.user_id, &password_hash)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        verify_password(password, password_hash)
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }
}

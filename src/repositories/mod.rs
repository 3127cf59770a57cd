pub mod admin_repository;
pub mod listing_repository;
pub mod user_repository;

pub use admin_repository::{AdminRepository, SqliteAdminRepository};
pub use listing_repository::{ListingRepository, SqliteListingRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Maps unique-constraint violations to `AlreadyExists`.
pub(crate) fn map_insert_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::AlreadyExists
        }
        _ => RepositoryError::Database(err),
    }
}

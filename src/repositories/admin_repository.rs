use super::{map_insert_error, RepositoryError, RepositoryResult};
use crate::models::admin::Admin;
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AdminRepository: Send + Sync {
    async fn create_admin(&self, username: &str, password_hash: &str) -> RepositoryResult<Admin>;
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<Admin>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Admin>>;
    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()>;
}

pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    async fn create_admin(&self, username: &str, password_hash: &str) -> RepositoryResult<Admin> {
        let result = sqlx::query("INSERT INTO admins (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(map_insert_error)?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE admins SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

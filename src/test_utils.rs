pub mod test_helpers {
    use crate::auth::password::hash_password;
    use crate::config::SessionConfig;
    use crate::models::listing::ListingStatus;
    use crate::{routes, AppState};
    use axum::Router;
    use sqlx::{
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
        SqlitePool,
    };
    use std::str::FromStr;
    use tower_sessions_sqlx_store::SqliteStore;

    /// Create a new in-memory SQLite database for testing. A single
    /// connection that never expires keeps the database alive.
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    fn hash(password: &str) -> Result<String, sqlx::Error> {
        hash_password(password).map_err(|e| {
            sqlx::Error::Configuration(format!("Password hashing failed: {}", e).into())
        })
    }

    /// Insert an advertiser with a hashed password
    pub async fn insert_test_user(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(hash(password)?)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn insert_test_admin(
        pool: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO admins (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(hash(password)?)
            .execute(pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a listing directly. An `ativo` listing is marked as approved.
    pub async fn create_test_listing(
        pool: &SqlitePool,
        user_id: i64,
        title: &str,
        status: ListingStatus,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO listings (user_id, title, description, price, status, approved_at)
            VALUES (?, ?, ?, ?, ?, CASE WHEN ? = 'ativo' THEN strftime('%Y-%m-%dT%H:%M:%fZ', 'now') END)
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(format!("Descrição de {}", title))
        .bind(100.0_f64)
        .bind(status)
        .bind(status.as_str())
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// The full API router over `pool`, with sessions stored in the same
    /// database.
    pub async fn create_test_app(pool: SqlitePool) -> Result<Router, sqlx::Error> {
        let store = SqliteStore::new(pool.clone())
            .with_table_name("sessions")
            .map_err(|e| sqlx::Error::Configuration(e.into()))?;
        store.migrate().await?;

        let session_layer = SessionConfig::from_env().create_layer(store);
        Ok(routes::build_router(AppState::new(pool), session_layer))
    }
}

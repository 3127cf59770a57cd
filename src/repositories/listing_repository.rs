use super::{RepositoryError, RepositoryResult};
use crate::models::listing::{
    Listing, ListingChanges, ListingFilter, ListingStatus, ListingWithOwner, ListingWithOwnerRow,
    NewListing,
};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const LISTING_COLUMNS: &str = "id, user_id, title, description, price, photo1, photo2, photo3, \
                               status, approved_at, created_at";

const SELECT_WITH_OWNER: &str = r#"
    SELECT
        l.id, l.user_id, l.title, l.description, l.price,
        l.photo1, l.photo2, l.photo3, l.status, l.approved_at, l.created_at,
        u.name AS owner_name, u.email AS owner_email
    FROM listings l
    JOIN users u ON u.id = l.user_id
"#;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ListingRepository: Send + Sync {
    /// Inserts a listing in `inativo` state.
    async fn create(&self, user_id: i64, listing: &NewListing) -> RepositoryResult<Listing>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Listing>>;
    async fn find_with_owner(&self, id: i64) -> RepositoryResult<Option<ListingWithOwner>>;
    async fn update(&self, id: i64, changes: &ListingChanges) -> RepositoryResult<()>;
    /// Sets the status; the first activation also records `approved_at`.
    async fn set_status(&self, id: i64, status: ListingStatus) -> RepositoryResult<()>;
    async fn delete(&self, id: i64) -> RepositoryResult<()>;
    async fn search(&self, filter: &ListingFilter) -> RepositoryResult<Vec<ListingWithOwner>>;
    async fn count(&self, status: Option<ListingStatus>) -> RepositoryResult<i64>;
}

pub struct SqliteListingRepository {
    pool: SqlitePool,
}

impl SqliteListingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so search terms match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ListingRepository for SqliteListingRepository {
    async fn create(&self, user_id: i64, listing: &NewListing) -> RepositoryResult<Listing> {
        let [photo1, photo2, photo3] = &listing.photos;

        let result = sqlx::query(
            r#"
            INSERT INTO listings (user_id, title, description, price, photo1, photo2, photo3, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.price)
        .bind(photo1)
        .bind(photo2)
        .bind(photo3)
        .bind(ListingStatus::Inativo)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(listing)
    }

    async fn find_with_owner(&self, id: i64) -> RepositoryResult<Option<ListingWithOwner>> {
        let row = sqlx::query_as::<_, ListingWithOwnerRow>(&format!(
            "{SELECT_WITH_OWNER} WHERE l.id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ListingWithOwner::from))
    }

    async fn update(&self, id: i64, changes: &ListingChanges) -> RepositoryResult<()> {
        if changes.is_empty() {
            return match self.find_by_id(id).await? {
                Some(_) => Ok(()),
                None => Err(RepositoryError::NotFound),
            };
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE listings SET ");
        let mut assignments = builder.separated(", ");

        if let Some(title) = &changes.title {
            assignments.push("title = ");
            assignments.push_bind_unseparated(title.clone());
        }
        if let Some(description) = &changes.description {
            assignments.push("description = ");
            assignments.push_bind_unseparated(description.clone());
        }
        if let Some(price) = changes.price {
            assignments.push("price = ");
            assignments.push_bind_unseparated(price);
        }
        if let Some(photo) = &changes.photo1 {
            assignments.push("photo1 = ");
            assignments.push_bind_unseparated(photo.clone());
        }
        if let Some(photo) = &changes.photo2 {
            assignments.push("photo2 = ");
            assignments.push_bind_unseparated(photo.clone());
        }
        if let Some(photo) = &changes.photo3 {
            assignments.push("photo3 = ");
            assignments.push_bind_unseparated(photo.clone());
        }
        if let Some(status) = changes.status {
            assignments.push("status = ");
            assignments.push_bind_unseparated(status);
        }

        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn set_status(&self, id: i64, status: ListingStatus) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE listings
            SET status = ?,
                approved_at = CASE
                    WHEN ? = 'ativo' THEN COALESCE(approved_at, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                    ELSE approved_at
                END
            WHERE id = ?
            "#,
        )
        .bind(status)
        .bind(status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM listings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn search(&self, filter: &ListingFilter) -> RepositoryResult<Vec<ListingWithOwner>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_WITH_OWNER);
        builder.push(" WHERE 1 = 1");

        if let Some(user_id) = filter.user_id {
            builder.push(" AND l.user_id = ").push_bind(user_id);
        }

        if let Some(status) = filter.status {
            builder.push(" AND l.status = ").push_bind(status);
        }

        if let Some(term) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        {
            let pattern = format!("%{}%", escape_like(term));
            builder
                .push(" AND (l.title LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR l.description LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        builder.push(" ORDER BY l.created_at DESC, l.id DESC");

        if let Some(limit) = filter.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder
            .build_query_as::<ListingWithOwnerRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ListingWithOwner::from).collect())
    }

    async fn count(&self, status: Option<ListingStatus>) -> RepositoryResult<i64> {
        let count = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings WHERE status = ?")
                    .bind(status)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM listings")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }
}

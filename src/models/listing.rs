use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Visibility of a listing. New listings are always `Inativo` until an
/// administrator publishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ListingStatus {
    Ativo,
    Inativo,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Ativo => "ativo",
            ListingStatus::Inativo => "inativo",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid listing status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for ListingStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ativo" => Ok(ListingStatus::Ativo),
            "inativo" => Ok(ListingStatus::Inativo),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor")]
    pub price: f64,
    #[serde(rename = "foto1")]
    pub photo1: Option<String>,
    #[serde(rename = "foto2")]
    pub photo2: Option<String>,
    #[serde(rename = "foto3")]
    pub photo3: Option<String>,
    pub status: ListingStatus,
    #[serde(skip)]
    pub approved_at: Option<String>,
    #[serde(rename = "criadoEm")]
    pub created_at: String,
}

impl Listing {
    pub fn was_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}

/// Owner block embedded in listing responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingOwner {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingWithOwner {
    #[serde(flatten)]
    pub listing: Listing,
    pub user: ListingOwner,
}

#[derive(Debug, Clone, FromRow)]
pub struct ListingWithOwnerRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub photo1: Option<String>,
    pub photo2: Option<String>,
    pub photo3: Option<String>,
    pub status: ListingStatus,
    pub approved_at: Option<String>,
    pub created_at: String,
    pub owner_name: String,
    pub owner_email: String,
}

impl From<ListingWithOwnerRow> for ListingWithOwner {
    fn from(row: ListingWithOwnerRow) -> Self {
        Self {
            user: ListingOwner {
                id: row.user_id,
                name: row.owner_name,
                email: row.owner_email,
            },
            listing: Listing {
                id: row.id,
                user_id: row.user_id,
                title: row.title,
                description: row.description,
                price: row.price,
                photo1: row.photo1,
                photo2: row.photo2,
                photo3: row.photo3,
                status: row.status,
                approved_at: row.approved_at,
                created_at: row.created_at,
            },
        }
    }
}

/// Validated input for inserting a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub photos: [Option<String>; 3],
}

/// Validated partial update. `None` leaves a column untouched; for photos
/// `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub photo1: Option<Option<String>>,
    pub photo2: Option<Option<String>>,
    pub photo3: Option<Option<String>>,
    pub status: Option<ListingStatus>,
}

impl ListingChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.photo1.is_none()
            && self.photo2.is_none()
            && self.photo3.is_none()
            && self.status.is_none()
    }
}

/// Query used by the listing search. `status: None` matches every status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub user_id: Option<i64>,
    pub status: Option<ListingStatus>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

/// Price as sent by clients: either a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            PriceInput::Number(n) => Some(*n),
            PriceInput::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateListingRequest {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor")]
    pub price: Option<PriceInput>,
    #[serde(rename = "foto1")]
    pub photo1: Option<String>,
    #[serde(rename = "foto2")]
    pub photo2: Option<String>,
    #[serde(rename = "foto3")]
    pub photo3: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListingRequest {
    pub id: Option<i64>,
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "valor")]
    pub price: Option<PriceInput>,
    #[serde(rename = "foto1", default, deserialize_with = "deserialize_some")]
    pub photo1: Option<Option<String>>,
    #[serde(rename = "foto2", default, deserialize_with = "deserialize_some")]
    pub photo2: Option<Option<String>>,
    #[serde(rename = "foto3", default, deserialize_with = "deserialize_some")]
    pub photo3: Option<Option<String>>,
    pub status: Option<String>,
}

/// Query string of the public listing search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: Option<i64>,
    pub status: Option<String>,
}

// Distinguishes an absent field from an explicit `null`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

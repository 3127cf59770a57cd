pub mod admin_handlers;
pub mod health;
pub mod listing_handlers;

pub use admin_handlers::*;
pub use health::health_check;
pub use listing_handlers::*;

use serde::Deserialize;

/// `?id=` on delete endpoints. Kept optional so a missing id is a 400 with
/// a readable message rather than a query rejection.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<i64>,
}

use crate::models::listing::{ListingFilter, ListingStatus, ListingWithOwner};
use crate::repositories::{ListingRepository, UserRepository};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const RECENT_LISTINGS: i64 = 5;

#[derive(Clone)]
pub struct DashboardService {
    user_repository: Arc<dyn UserRepository>,
    listing_repository: Arc<dyn ListingRepository>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(rename = "totalUsuarios")]
    pub total_users: i64,
    #[serde(rename = "totalAnuncios")]
    pub total_listings: i64,
    #[serde(rename = "anunciosPendentes")]
    pub pending_listings: i64,
    #[serde(rename = "anunciosRecentes")]
    pub recent_listings: Vec<ListingWithOwner>,
}

impl DashboardService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        listing_repository: Arc<dyn ListingRepository>,
    ) -> Self {
        Self {
            user_repository,
            listing_repository,
        }
    }

    /// Overview for the moderation dashboard: account and listing totals,
    /// listings awaiting moderation and the most recent listings.
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        let total_users = self
            .user_repository
            .count_users()
            .await
            .context("counting users")?;

        let total_listings = self
            .listing_repository
            .count(None)
            .await
            .context("counting listings")?;

        let pending_listings = self
            .listing_repository
            .count(Some(ListingStatus::Inativo))
            .await
            .context("counting pending listings")?;

        let recent_listings = self
            .listing_repository
            .search(&ListingFilter {
                limit: Some(RECENT_LISTINGS),
                ..ListingFilter::default()
            })
            .await
            .context("loading recent listings")?;

        Ok(DashboardStats {
            total_users,
            total_listings,
            pending_listings,
            recent_listings,
        })
    }
}

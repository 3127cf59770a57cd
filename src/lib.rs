pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod validation;

// Shared by unit tests and the integration tests under tests/
pub mod test_utils;

use repositories::{
    AdminRepository, ListingRepository, SqliteAdminRepository, SqliteListingRepository,
    SqliteUserRepository, UserRepository,
};
use services::{AuthService, DashboardService, ListingService, UserService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub listing_service: Arc<ListingService>,
    pub dashboard_service: Arc<DashboardService>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wires the SQLite repositories into the services.
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone()));
        let admin_repository: Arc<dyn AdminRepository> =
            Arc::new(SqliteAdminRepository::new(pool.clone()));
        let listing_repository: Arc<dyn ListingRepository> =
            Arc::new(SqliteListingRepository::new(pool.clone()));

        Self {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(
                user_repository.clone(),
                admin_repository,
            )),
            listing_service: Arc::new(ListingService::new(listing_repository.clone())),
            dashboard_service: Arc::new(DashboardService::new(
                user_repository,
                listing_repository,
            )),
            pool,
        }
    }
}

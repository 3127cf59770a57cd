pub mod admin_service;
pub mod auth_service;
pub mod dashboard_service;
pub mod listing_service;
pub mod seed_service;
pub mod user_service;

pub use admin_service::{AdminService, AdminServiceError};
pub use auth_service::{AdminLoginRequest, AuthService, AuthServiceError, LoginRequest};
pub use dashboard_service::{DashboardService, DashboardStats};
pub use listing_service::{ListingService, ListingServiceError};
pub use seed_service::{SeedReport, SeedService};
pub use user_service::{CreateUserRequest, UpdatePasswordRequest, UserService, UserServiceError};

pub mod admin;
pub mod listing;
pub mod user;

pub use admin::{Admin, AdminResponse};
pub use listing::{
    CreateListingRequest, Listing, ListingChanges, ListingFilter, ListingOwner, ListingQuery,
    ListingStatus, ListingWithOwner, NewListing, PriceInput, UpdateListingRequest,
    UpdateStatusRequest,
};
pub use user::{User, UserResponse, UserSummary};

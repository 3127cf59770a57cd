use super::IdQuery;
use crate::auth::CurrentAdmin;
use crate::error::{AppError, Result};
use crate::models::listing::{ListingWithOwner, UpdateStatusRequest};
use crate::models::user::UserSummary;
use crate::services::DashboardStats;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use tracing::info;

/// GET /api/admin/anuncios
pub async fn admin_list_listings_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListingWithOwner>>> {
    Ok(Json(state.listing_service.list_all().await?))
}

/// PUT /api/admin/anuncios
pub async fn admin_update_listing_status_handler(
    State(state): State<AppState>,
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
    payload: std::result::Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<ListingWithOwner>> {
    let Json(request) = payload?;
    let updated = state.listing_service.set_status(request).await?;

    info!(
        admin_id = admin.id,
        listing_id = updated.listing.id,
        status = %updated.listing.status,
        "Listing moderated"
    );
    Ok(Json(updated))
}

/// GET /api/admin/users
pub async fn admin_list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserSummary>>> {
    Ok(Json(state.user_service.list_users().await?))
}

/// DELETE /api/admin/users?id=
pub async fn admin_delete_user_handler(
    State(state): State<AppState>,
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
    query: std::result::Result<Query<IdQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let user_id = query
        .id
        .ok_or_else(|| AppError::Validation("ID do usuário é obrigatório".to_string()))?;

    let removed_listings = state.user_service.delete_user(user_id).await?;
    info!(
        admin_id = admin.id,
        user_id, removed_listings, "User deleted with their listings"
    );

    Ok(Json(json!({ "message": "Usuário excluído com sucesso" })))
}

/// GET /api/admin/dashboard
pub async fn admin_dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>> {
    Ok(Json(state.dashboard_service.get_dashboard_stats().await?))
}

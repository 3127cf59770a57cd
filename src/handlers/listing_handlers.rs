use super::IdQuery;
use crate::auth::{session::viewer, CurrentUser};
use crate::error::Result;
use crate::models::listing::{
    CreateListingRequest, Listing, ListingQuery, ListingWithOwner, UpdateListingRequest,
};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use tower_sessions::Session;

/// GET /api/anuncios/list?userId=&status=&search=
pub async fn list_listings_handler(
    State(state): State<AppState>,
    session: Session,
    query: std::result::Result<Query<ListingQuery>, QueryRejection>,
) -> Result<Json<Vec<ListingWithOwner>>> {
    let Query(query) = query?;
    let viewer = viewer(&session).await?;

    let listings = state.listing_service.search(query, viewer).await?;
    Ok(Json(listings))
}

/// GET /api/anuncios/mine
pub async fn my_listings_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<ListingWithOwner>>> {
    Ok(Json(state.listing_service.list_for_owner(user.id).await?))
}

/// GET /api/anuncios/{id}
pub async fn get_listing_handler(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<ListingWithOwner>> {
    let viewer = viewer(&session).await?;
    Ok(Json(state.listing_service.get_listing(id, viewer).await?))
}

/// POST /api/anuncios/create
pub async fn create_listing_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<CreateListingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Listing>)> {
    let Json(request) = payload?;
    let listing = state
        .listing_service
        .create_listing(user.id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// PUT /api/anuncios/update
pub async fn update_listing_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: std::result::Result<Json<UpdateListingRequest>, JsonRejection>,
) -> Result<Json<ListingWithOwner>> {
    let Json(request) = payload?;
    Ok(Json(
        state.listing_service.update_listing(user.id, request).await?,
    ))
}

/// DELETE /api/anuncios/delete?id=
pub async fn delete_listing_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: std::result::Result<Query<IdQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    state
        .listing_service
        .delete_listing(user.id, query.id)
        .await?;
    Ok(Json(json!({ "message": "Anúncio excluído com sucesso" })))
}

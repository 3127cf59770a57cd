use crate::auth::session::Viewer;
use crate::models::listing::{
    CreateListingRequest, Listing, ListingChanges, ListingFilter, ListingQuery, ListingStatus,
    ListingWithOwner, NewListing, PriceInput, UpdateListingRequest, UpdateStatusRequest,
};
use crate::repositories::{ListingRepository, RepositoryError};
use crate::validation::{
    is_valid_price, normalize_photo, required, MAX_DESCRIPTION_LENGTH, MAX_PHOTO_REF_LENGTH,
    MAX_TITLE_LENGTH,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Anúncio não encontrado")]
    NotFound,
    #[error("{0}")]
    Forbidden(String),
    #[error("Repository error: {0}")]
    RepositoryError(RepositoryError),
}

impl From<RepositoryError> for ListingServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ListingServiceError::NotFound,
            other => ListingServiceError::RepositoryError(other),
        }
    }
}

type Result<T> = std::result::Result<T, ListingServiceError>;

fn invalid(msg: &str) -> ListingServiceError {
    ListingServiceError::Validation(msg.to_string())
}

pub struct ListingService {
    repository: Arc<dyn ListingRepository>,
}

impl ListingService {
    pub fn new(repository: Arc<dyn ListingRepository>) -> Self {
        Self { repository }
    }

    /// Creates a listing owned by `owner_id`. The status is always
    /// `inativo`; nothing in the request can override it.
    pub async fn create_listing(
        &self,
        owner_id: i64,
        request: CreateListingRequest,
    ) -> Result<Listing> {
        let missing = || invalid("Todos os campos obrigatórios devem ser preenchidos");

        let title = required(request.title.as_deref()).ok_or_else(missing)?;
        let description = required(request.description.as_deref()).ok_or_else(missing)?;
        let price = request.price.as_ref().ok_or_else(missing)?;

        let listing = NewListing {
            title: validate_title(title)?,
            description: validate_description(description)?,
            price: validate_price(price)?,
            photos: [
                validate_photo(request.photo1)?,
                validate_photo(request.photo2)?,
                validate_photo(request.photo3)?,
            ],
        };

        let created = self.repository.create(owner_id, &listing).await?;
        info!(listing_id = created.id, owner_id, "Listing created");
        Ok(created)
    }

    /// Owner-side partial update. Activation is only allowed once an
    /// administrator has approved the listing at least once.
    pub async fn update_listing(
        &self,
        owner_id: i64,
        request: UpdateListingRequest,
    ) -> Result<ListingWithOwner> {
        let id = request
            .id
            .ok_or_else(|| invalid("ID do anúncio é obrigatório"))?;
        let listing = self.owned_listing(id, owner_id).await?;

        let changes = ListingChanges {
            title: request
                .title
                .as_deref()
                .map(|t| validate_title(t.trim()))
                .transpose()?,
            description: request
                .description
                .as_deref()
                .map(|d| validate_description(d.trim()))
                .transpose()?,
            price: request.price.as_ref().map(validate_price).transpose()?,
            photo1: request.photo1.map(validate_photo).transpose()?,
            photo2: request.photo2.map(validate_photo).transpose()?,
            photo3: request.photo3.map(validate_photo).transpose()?,
            status: request.status.as_deref().map(parse_status).transpose()?,
        };

        if changes.status == Some(ListingStatus::Ativo) && !listing.was_approved() {
            return Err(ListingServiceError::Forbidden(
                "Anúncio aguardando aprovação do administrador".to_string(),
            ));
        }

        self.repository.update(id, &changes).await?;
        if let Some(status) = changes.status {
            info!(listing_id = id, owner_id, %status, "Listing status changed by owner");
        }

        self.repository
            .find_with_owner(id)
            .await?
            .ok_or(ListingServiceError::NotFound)
    }

    pub async fn delete_listing(&self, owner_id: i64, id: Option<i64>) -> Result<()> {
        let id = id.ok_or_else(|| invalid("ID do anúncio é obrigatório"))?;
        self.owned_listing(id, owner_id).await?;

        self.repository.delete(id).await?;
        info!(listing_id = id, owner_id, "Listing deleted");
        Ok(())
    }

    /// Public search. Without an explicit status only `ativo` listings are
    /// returned; `inativo` may only be requested by an admin or by a user
    /// filtering on its own listings.
    pub async fn search(
        &self,
        query: ListingQuery,
        viewer: Viewer,
    ) -> Result<Vec<ListingWithOwner>> {
        let status = match required(query.status.as_deref()) {
            Some(raw) => parse_status(raw)?,
            None => ListingStatus::Ativo,
        };

        if status == ListingStatus::Inativo {
            let allowed = match viewer {
                Viewer::Admin(_) => true,
                Viewer::User(user_id) => query.user_id == Some(user_id),
                Viewer::Anonymous => false,
            };
            if !allowed {
                return Err(ListingServiceError::Forbidden(
                    "Sem permissão para listar anúncios inativos".to_string(),
                ));
            }
        }

        let filter = ListingFilter {
            user_id: query.user_id,
            status: Some(status),
            search: query.search,
            limit: None,
        };

        Ok(self.repository.search(&filter).await?)
    }

    /// Every listing owned by `owner_id`, whatever its status.
    pub async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<ListingWithOwner>> {
        let filter = ListingFilter {
            user_id: Some(owner_id),
            ..ListingFilter::default()
        };
        Ok(self.repository.search(&filter).await?)
    }

    /// A single listing. Inactive listings are hidden from everyone but
    /// their owner and administrators.
    pub async fn get_listing(&self, id: i64, viewer: Viewer) -> Result<ListingWithOwner> {
        let found = self
            .repository
            .find_with_owner(id)
            .await?
            .ok_or(ListingServiceError::NotFound)?;

        let visible = match (found.listing.status, viewer) {
            (ListingStatus::Ativo, _) => true,
            (ListingStatus::Inativo, Viewer::Admin(_)) => true,
            (ListingStatus::Inativo, Viewer::User(user_id)) => found.listing.user_id == user_id,
            (ListingStatus::Inativo, Viewer::Anonymous) => false,
        };

        if visible {
            Ok(found)
        } else {
            Err(ListingServiceError::NotFound)
        }
    }

    /// Every listing with owner info, newest first.
    pub async fn list_all(&self) -> Result<Vec<ListingWithOwner>> {
        Ok(self.repository.search(&ListingFilter::default()).await?)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<ListingWithOwner>> {
        let filter = ListingFilter {
            limit: Some(limit),
            ..ListingFilter::default()
        };
        Ok(self.repository.search(&filter).await?)
    }

    pub async fn count(&self, status: Option<ListingStatus>) -> Result<i64> {
        Ok(self.repository.count(status).await?)
    }

    /// Moderation: sets the status of any listing. Repeating the same
    /// status is a no-op transition.
    pub async fn set_status(&self, request: UpdateStatusRequest) -> Result<ListingWithOwner> {
        let (id, raw_status) = match (request.id, required(request.status.as_deref())) {
            (Some(id), Some(status)) => (id, status),
            _ => return Err(invalid("ID e status são obrigatórios")),
        };
        let status = parse_status(raw_status)?;

        self.repository.set_status(id, status).await?;

        self.repository
            .find_with_owner(id)
            .await?
            .ok_or(ListingServiceError::NotFound)
    }

    async fn owned_listing(&self, id: i64, owner_id: i64) -> Result<Listing> {
        let listing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ListingServiceError::NotFound)?;

        if listing.user_id != owner_id {
            return Err(ListingServiceError::Forbidden(
                "Este anúncio pertence a outro usuário".to_string(),
            ));
        }

        Ok(listing)
    }
}

fn parse_status(raw: &str) -> Result<ListingStatus> {
    raw.parse::<ListingStatus>()
        .map_err(|_| invalid("Status deve ser 'ativo' ou 'inativo'"))
}

fn validate_title(title: &str) -> Result<String> {
    if title.is_empty() {
        return Err(invalid("Título é obrigatório"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(invalid("Título muito longo"));
    }
    Ok(title.to_string())
}

fn validate_description(description: &str) -> Result<String> {
    if description.is_empty() {
        return Err(invalid("Descrição é obrigatória"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(invalid("Descrição muito longa"));
    }
    Ok(description.to_string())
}

fn validate_price(price: &PriceInput) -> Result<f64> {
    price
        .to_f64()
        .filter(|p| is_valid_price(*p))
        .ok_or_else(|| invalid("Valor deve ser um número positivo"))
}

fn validate_photo(photo: Option<String>) -> Result<Option<String>> {
    let photo = normalize_photo(photo);
    if photo
        .as_ref()
        .is_some_and(|p| p.len() > MAX_PHOTO_REF_LENGTH)
    {
        return Err(invalid("Referência de foto muito longa"));
    }
    Ok(photo)
}

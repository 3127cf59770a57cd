use crate::models::listing::{ListingStatus, NewListing};
use crate::repositories::ListingRepository;
use crate::services::admin_service::AdminService;
use crate::services::user_service::{CreateUserRequest, UserService};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEMO_USER_PASSWORD: &str = "senha123";

struct DemoListing {
    title: &'static str,
    description: &'static str,
    price: f64,
    status: ListingStatus,
    photos: [Option<&'static str>; 3],
}

struct DemoAdvertiser {
    name: &'static str,
    email: &'static str,
    listings: &'static [DemoListing],
}

const DEMO_ADVERTISERS: &[DemoAdvertiser] = &[
    DemoAdvertiser {
        name: "Maria Silva",
        email: "usuario1@exemplo.com",
        listings: &[
            DemoListing {
                title: "Bicicleta aro 29 seminova",
                description: "Quadro de alumínio, 21 marchas, freio a disco. Revisada \
                              no mês passado.",
                price: 1200.0,
                status: ListingStatus::Ativo,
                photos: [
                    Some("https://via.placeholder.com/600x400?text=Bicicleta+1"),
                    Some("https://via.placeholder.com/600x400?text=Bicicleta+2"),
                    None,
                ],
            },
            DemoListing {
                title: "Sofá retrátil de três lugares",
                description: "Tecido suede cinza, assento retrátil e encosto reclinável. \
                              Retirada no local.",
                price: 850.0,
                status: ListingStatus::Ativo,
                photos: [
                    Some("https://via.placeholder.com/600x400?text=Sofa"),
                    None,
                    None,
                ],
            },
        ],
    },
    DemoAdvertiser {
        name: "Ana Santos",
        email: "usuario2@exemplo.com",
        listings: &[DemoListing {
            title: "Notebook 14 polegadas",
            description: "16 GB de RAM, SSD de 512 GB, bateria em ótimo estado. \
                          Acompanha carregador.",
            price: 2500.0,
            status: ListingStatus::Inativo,
            photos: [
                Some("https://via.placeholder.com/600x400?text=Notebook"),
                None,
                None,
            ],
        }],
    },
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub users_created: usize,
    pub listings_created: usize,
}

/// Populates an empty database with the default admin and demo data.
/// Running it again does not duplicate anything.
pub struct SeedService {
    user_service: Arc<UserService>,
    admin_service: Arc<AdminService>,
    listing_repository: Arc<dyn ListingRepository>,
}

impl SeedService {
    pub fn new(
        user_service: Arc<UserService>,
        admin_service: Arc<AdminService>,
        listing_repository: Arc<dyn ListingRepository>,
    ) -> Self {
        Self {
            user_service,
            admin_service,
            listing_repository,
        }
    }

    pub async fn run(&self, admin_password: &str) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        let (admin, created) = self
            .admin_service
            .ensure_admin(DEFAULT_ADMIN_USERNAME, admin_password)
            .await
            .context("creating default admin")?;
        report.admin_created = created;
        info!(admin_id = admin.id, created, "Admin account ready");

        for advertiser in DEMO_ADVERTISERS {
            if self
                .user_service
                .find_user_by_email(advertiser.email)
                .await?
                .is_some()
            {
                continue;
            }

            let user = self
                .user_service
                .create_user(CreateUserRequest {
                    name: advertiser.name.to_string(),
                    email: advertiser.email.to_string(),
                    password: DEMO_USER_PASSWORD.to_string(),
                })
                .await
                .with_context(|| format!("creating demo user {}", advertiser.email))?;
            report.users_created += 1;

            for demo in advertiser.listings {
                let listing = self
                    .listing_repository
                    .create(
                        user.id,
                        &NewListing {
                            title: demo.title.to_string(),
                            description: demo.description.to_string(),
                            price: demo.price,
                            photos: demo.photos.map(|p| p.map(str::to_string)),
                        },
                    )
                    .await?;

                if demo.status == ListingStatus::Ativo {
                    self.listing_repository
                        .set_status(listing.id, ListingStatus::Ativo)
                        .await?;
                }
                report.listings_created += 1;
            }
        }

        Ok(report)
    }
}

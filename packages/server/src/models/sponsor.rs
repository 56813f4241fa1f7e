use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_link_fields;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SponsorRequest {
    #[schema(example = "Acme Corp")]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    /// Sponsor website.
    #[serde(default)]
    #[schema(example = "https://acme.example.com")]
    pub redirect: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateSponsorRequest {
    #[schema(example = 1)]
    pub id: Option<i32>,
    #[serde(flatten)]
    pub fields: SponsorRequest,
}

pub fn validate_sponsor(req: &SponsorRequest) -> Result<(), AppError> {
    validate_link_fields(&req.name, &req.image_url, &req.redirect)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SponsorResponse {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub redirect: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::sponsor::Model> for SponsorResponse {
    fn from(m: crate::entity::sponsor::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            image_url: m.image_url,
            redirect: m.redirect,
            created_at: m.created_at,
        }
    }
}

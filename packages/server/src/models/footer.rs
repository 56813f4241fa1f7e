use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_link_fields;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct FooterRequest {
    #[schema(example = "Contact us")]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    /// Where the entry links to.
    #[serde(default)]
    #[schema(example = "https://example.com/contact")]
    pub redirect: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateFooterRequest {
    #[schema(example = 1)]
    pub id: Option<i32>,
    #[serde(flatten)]
    pub fields: FooterRequest,
}

pub fn validate_footer(req: &FooterRequest) -> Result<(), AppError> {
    validate_link_fields(&req.name, &req.image_url, &req.redirect)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FooterResponse {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub redirect: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::footer::Model> for FooterResponse {
    fn from(m: crate::entity::footer::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            image_url: m.image_url,
            redirect: m.redirect,
            created_at: m.created_at,
        }
    }
}

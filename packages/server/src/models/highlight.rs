use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::{MAX_AUTHOR_LEN, MAX_URL_LEN, validate_max_len, validate_title};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct HighlightRequest {
    #[schema(example = "Robotics team wins regionals")]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_by: String,
}

/// Highlight update. The target id travels in the body.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateHighlightRequest {
    #[schema(example = 1)]
    pub id: Option<i32>,
    #[serde(flatten)]
    pub fields: HighlightRequest,
}

pub fn validate_highlight(req: &HighlightRequest) -> Result<(), AppError> {
    validate_title("Title", &req.title)?;
    validate_max_len("Image", &req.image, MAX_URL_LEN)?;
    validate_max_len("Created by", &req.created_by, MAX_AUTHOR_LEN)?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HighlightResponse {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub content: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::highlight::Model> for HighlightResponse {
    fn from(m: crate::entity::highlight::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            image: m.image,
            content: m.content,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::{MAX_AUTHOR_LEN, MAX_URL_LEN, validate_max_len, validate_title};

/// Body for creating or updating a news article. Updates overwrite every field.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct NewsRequest {
    #[schema(example = "Campus opens new library")]
    pub title: String,
    /// Cover image URL.
    #[serde(default)]
    #[schema(example = "https://cdn.example.com/library.jpg")]
    pub image: String,
    /// Short summary shown in listings.
    #[serde(default)]
    pub detail: String,
    /// Full article body.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    #[schema(example = "editorial")]
    pub created_by: String,
}

pub fn validate_news(req: &NewsRequest) -> Result<(), AppError> {
    validate_title("Title", &req.title)?;
    validate_max_len("Image", &req.image, MAX_URL_LEN)?;
    validate_max_len("Created by", &req.created_by, MAX_AUTHOR_LEN)?;
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct NewsResponse {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub detail: String,
    pub content: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::news::Model> for NewsResponse {
    fn from(m: crate::entity::news::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            image: m.image,
            detail: m.detail,
            content: m.content,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

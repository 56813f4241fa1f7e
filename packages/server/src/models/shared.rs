use std::collections::HashSet;

use sea_orm::Order;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Paginated list envelope shared by every list endpoint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    /// Total number of matching rows across all pages.
    #[schema(example = 5)]
    pub total: u64,
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 2)]
    pub limit: u64,
    #[serde(rename = "totalPages")]
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, params: &ListParams) -> Self {
        Self {
            data,
            total,
            page: params.page,
            limit: params.limit,
            total_pages: total.div_ceil(params.limit),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// `{message, data}` envelope for single-record and feed responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse<T> {
    #[schema(example = "Success")]
    pub message: String,
    pub data: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    pub fn success(data: T) -> Self {
        Self::new("Success", data)
    }
}

/// Bare `{message}` body, used by deletes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StatusMessage {
    #[schema(example = "News deleted successfully")]
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raw list query. Values stay strings so bad input gets a clear 400
/// instead of an extractor rejection.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (1-based). Required.
    pub page: Option<String>,
    /// Items per page, at most 100. Required.
    pub limit: Option<String>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
    /// Sort field; unknown values fall back to `created_at`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub order: Option<String>,
}

/// Largest accepted `limit` on list endpoints.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Validated list parameters.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub page: u64,
    pub limit: u64,
    /// Rows skipped before this page; always fits in an `i64`.
    pub offset: u64,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Order,
}

impl ListQuery {
    pub fn validate(self) -> Result<ListParams, AppError> {
        let page = parse_positive(self.page.as_deref(), "page")?;
        let limit = parse_positive(self.limit.as_deref(), "limit")?;
        if limit > MAX_PAGE_LIMIT {
            return Err(AppError::Validation(format!(
                "'limit' must be at most {MAX_PAGE_LIMIT}"
            )));
        }
        let offset = (page - 1)
            .checked_mul(limit)
            .filter(|o| i64::try_from(*o).is_ok())
            .ok_or_else(|| AppError::Validation("'page' is out of range".into()))?;
        let order = match self.order.as_deref().map(str::to_ascii_lowercase) {
            Some(o) if o == "asc" => Order::Asc,
            _ => Order::Desc,
        };
        Ok(ListParams {
            page,
            limit,
            offset,
            search: self.search.filter(|s| !s.trim().is_empty()),
            sort_by: self.sort_by,
            order,
        })
    }
}

fn parse_positive(raw: Option<&str>, name: &str) -> Result<u64, AppError> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v >= 1)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "'{name}' query parameter is required and must be a positive integer"
            ))
        })
}

/// `?id=` query used by get-by-id and delete endpoints.
#[derive(Deserialize, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Record ID.
    pub id: Option<String>,
}

impl IdQuery {
    pub fn require(&self) -> Result<i32, AppError> {
        let raw = self
            .id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing id parameter".into()))?;
        raw.parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Validation("Invalid id parameter".into()))
    }
}

/// Body-carried id for update endpoints that take the record in the body.
pub fn require_body_id(id: Option<i32>) -> Result<i32, AppError> {
    match id {
        Some(id) if id > 0 => Ok(id),
        Some(_) => Err(AppError::Validation("Invalid ID in request".into())),
        None => Err(AppError::Validation("Missing ID in request".into())),
    }
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a trimmed title or name (1-256 Unicode characters).
pub fn validate_title(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}

/// Longest accepted image or redirect URL.
pub const MAX_URL_LEN: usize = 512;
/// Longest accepted `created_by` value.
pub const MAX_AUTHOR_LEN: usize = 256;

/// Validate a role or permission name (1-64 characters).
pub fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 64 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-64 characters"
        )));
    }
    Ok(())
}

/// Shared checks for footer and sponsor entries.
pub fn validate_link_fields(name: &str, image_url: &str, redirect: &str) -> Result<(), AppError> {
    validate_title("Name", name)?;
    validate_max_len("Image URL", image_url, MAX_URL_LEN)?;
    validate_max_len("Redirect", redirect, MAX_URL_LEN)?;
    Ok(())
}

/// Validate an optional short text field such as a URL or author name.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate an ID list for bulk operations (non-empty, no duplicates, max length).
pub fn validate_bulk_ids(ids: &[i32], name: &str, max: usize) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation(format!("No {name} provided")));
    }
    if ids.len() > max {
        return Err(AppError::Validation(format!("Too many {name}: max {max}")));
    }
    let mut seen = HashSet::new();
    for &id in ids {
        if id <= 0 {
            return Err(AppError::Validation(format!("Invalid {name} ID: {id}")));
        }
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("Duplicate {name} ID: {id}")));
        }
    }
    Ok(())
}

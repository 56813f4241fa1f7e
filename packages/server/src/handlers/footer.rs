use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::footer;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::footer::{FooterRequest, FooterResponse, UpdateFooterRequest, validate_footer};
use crate::models::shared::{
    IdQuery, ListQuery, MessageResponse, Paginated, StatusMessage, require_body_id,
};
use crate::state::AppState;
use crate::utils::listing::{ListSpec, fetch_page};

const FOOTER_LIST: ListSpec<footer::Column> = ListSpec {
    search: &[footer::Column::Name, footer::Column::Redirect],
    sort: &[
        ("id", footer::Column::Id),
        ("name", footer::Column::Name),
        ("created_at", footer::Column::CreatedAt),
    ],
    default_sort: footer::Column::CreatedAt,
    tie_breaker: footer::Column::Id,
};

#[utoipa::path(
    get,
    path = "/footers",
    tag = "Footers",
    operation_id = "listFooters",
    summary = "List footer entries",
    description = "Searches `name` and `redirect`. `sortBy` accepts `id`, `name` and `created_at`.",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of footer entries", body = Paginated<FooterResponse>),
        (status = 400, description = "Missing or invalid page/limit (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_footers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<FooterResponse>>, AppError> {
    let params = query.validate()?;
    let page = fetch_page(&state.db, footer::Entity::find(), &FOOTER_LIST, &params).await?;
    Ok(Json(page.map(FooterResponse::from)))
}

#[utoipa::path(
    get,
    path = "/footers/getbyid",
    tag = "Footers",
    operation_id = "getFooter",
    summary = "Get a footer entry by ID",
    params(IdQuery),
    responses(
        (status = 200, description = "Footer entry", body = MessageResponse<FooterResponse>),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Footer not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_footer(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse<FooterResponse>>, AppError> {
    let id = query.require()?;
    let model = find_footer(&state.db, id).await?;
    Ok(Json(MessageResponse::success(model.into())))
}

#[utoipa::path(
    post,
    path = "/footers/create",
    tag = "Footers",
    operation_id = "createFooter",
    summary = "Create a footer entry",
    request_body = FooterRequest,
    responses(
        (status = 200, description = "Footer created", body = MessageResponse<FooterResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_footer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FooterRequest>,
) -> Result<Json<MessageResponse<FooterResponse>>, AppError> {
    validate_footer(&payload)?;

    let model = footer::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        image_url: Set(payload.image_url),
        redirect: Set(payload.redirect),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(id = model.id, "Footer created");
    Ok(Json(MessageResponse::new(
        "Footer created successfully",
        model.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/footers/update",
    tag = "Footers",
    operation_id = "updateFooter",
    summary = "Update a footer entry",
    request_body = UpdateFooterRequest,
    responses(
        (status = 200, description = "Footer updated", body = MessageResponse<FooterResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Footer not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = ?payload.id))]
pub async fn update_footer(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateFooterRequest>,
) -> Result<Json<MessageResponse<FooterResponse>>, AppError> {
    let id = require_body_id(payload.id)?;
    let fields = payload.fields;
    validate_footer(&fields)?;

    let mut active: footer::ActiveModel = find_footer(&state.db, id).await?.into();
    active.name = Set(fields.name.trim().to_string());
    active.image_url = Set(fields.image_url);
    active.redirect = Set(fields.redirect);
    let model = active.update(&state.db).await?;

    Ok(Json(MessageResponse::new(
        "Footer updated successfully",
        model.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/footers/delete",
    tag = "Footers",
    operation_id = "deleteFooter",
    summary = "Delete a footer entry",
    params(IdQuery),
    responses(
        (status = 200, description = "Footer deleted", body = StatusMessage),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Footer not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn delete_footer(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let id = query.require()?;

    let result = footer::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Footer not found".into()));
    }

    info!(id, "Footer deleted");
    Ok(Json(StatusMessage::new("Footer deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/footers_home",
    tag = "Footers",
    operation_id = "footersHome",
    summary = "All footer entries for the site footer",
    responses(
        (status = 200, description = "Every footer entry, newest first", body = MessageResponse<Vec<FooterResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn footers_home(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse<Vec<FooterResponse>>>, AppError> {
    let data = footer::Entity::find()
        .order_by_desc(footer::Column::CreatedAt)
        .order_by_desc(footer::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(MessageResponse::success(
        data.into_iter().map(Into::into).collect(),
    )))
}

async fn find_footer<C: ConnectionTrait>(db: &C, id: i32) -> Result<footer::Model, AppError> {
    footer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Footer not found".into()))
}

use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::sponsor;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::sponsor::{
    SponsorRequest, SponsorResponse, UpdateSponsorRequest, validate_sponsor,
};
use crate::models::shared::{
    IdQuery, ListQuery, MessageResponse, Paginated, StatusMessage, require_body_id,
};
use crate::state::AppState;
use crate::utils::listing::{ListSpec, fetch_page};

const SPONSOR_LIST: ListSpec<sponsor::Column> = ListSpec {
    search: &[sponsor::Column::Name, sponsor::Column::Redirect],
    sort: &[
        ("id", sponsor::Column::Id),
        ("name", sponsor::Column::Name),
        ("created_at", sponsor::Column::CreatedAt),
    ],
    default_sort: sponsor::Column::CreatedAt,
    tie_breaker: sponsor::Column::Id,
};

#[utoipa::path(
    get,
    path = "/sponsors",
    tag = "Sponsors",
    operation_id = "listSponsors",
    summary = "List sponsors",
    description = "Searches `name` and `redirect`. `sortBy` accepts `id`, `name` and `created_at`.",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of sponsors", body = Paginated<SponsorResponse>),
        (status = 400, description = "Missing or invalid page/limit (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_sponsors(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<SponsorResponse>>, AppError> {
    let params = query.validate()?;
    let page = fetch_page(
        &state.db,
        sponsor::Entity::find(),
        &SPONSOR_LIST,
        &params,
    )
    .await?;
    Ok(Json(page.map(SponsorResponse::from)))
}

#[utoipa::path(
    get,
    path = "/sponsors/getbyid",
    tag = "Sponsors",
    operation_id = "getSponsor",
    summary = "Get a sponsor by ID",
    params(IdQuery),
    responses(
        (status = 200, description = "Sponsor", body = MessageResponse<SponsorResponse>),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Sponsor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_sponsor(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse<SponsorResponse>>, AppError> {
    let id = query.require()?;
    let model = find_sponsor(&state.db, id).await?;
    Ok(Json(MessageResponse::success(model.into())))
}

#[utoipa::path(
    post,
    path = "/sponsors/create",
    tag = "Sponsors",
    operation_id = "createSponsor",
    summary = "Create a sponsor",
    request_body = SponsorRequest,
    responses(
        (status = 200, description = "Sponsor created", body = MessageResponse<SponsorResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn create_sponsor(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SponsorRequest>,
) -> Result<Json<MessageResponse<SponsorResponse>>, AppError> {
    validate_sponsor(&payload)?;

    let model = sponsor::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        image_url: Set(payload.image_url),
        redirect: Set(payload.redirect),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(id = model.id, "Sponsor created");
    Ok(Json(MessageResponse::new(
        "Sponsor created successfully",
        model.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/sponsors/update",
    tag = "Sponsors",
    operation_id = "updateSponsor",
    summary = "Update a sponsor",
    request_body = UpdateSponsorRequest,
    responses(
        (status = 200, description = "Sponsor updated", body = MessageResponse<SponsorResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Sponsor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = ?payload.id))]
pub async fn update_sponsor(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateSponsorRequest>,
) -> Result<Json<MessageResponse<SponsorResponse>>, AppError> {
    let id = require_body_id(payload.id)?;
    let fields = payload.fields;
    validate_sponsor(&fields)?;

    let mut active: sponsor::ActiveModel = find_sponsor(&state.db, id).await?.into();
    active.name = Set(fields.name.trim().to_string());
    active.image_url = Set(fields.image_url);
    active.redirect = Set(fields.redirect);
    let model = active.update(&state.db).await?;

    Ok(Json(MessageResponse::new(
        "Sponsor updated successfully",
        model.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/sponsors/delete",
    tag = "Sponsors",
    operation_id = "deleteSponsor",
    summary = "Delete a sponsor",
    params(IdQuery),
    responses(
        (status = 200, description = "Sponsor deleted", body = StatusMessage),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Sponsor not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn delete_sponsor(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let id = query.require()?;

    let result = sponsor::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Sponsor not found".into()));
    }

    info!(id, "Sponsor deleted");
    Ok(Json(StatusMessage::new("Sponsor deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/sponsors_home",
    tag = "Sponsors",
    operation_id = "sponsorsHome",
    summary = "All sponsors for the home page",
    responses(
        (status = 200, description = "Every sponsor, newest first", body = MessageResponse<Vec<SponsorResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn sponsors_home(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse<Vec<SponsorResponse>>>, AppError> {
    let data = sponsor::Entity::find()
        .order_by_desc(sponsor::Column::CreatedAt)
        .order_by_desc(sponsor::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(MessageResponse::success(
        data.into_iter().map(Into::into).collect(),
    )))
}

async fn find_sponsor<C: ConnectionTrait>(db: &C, id: i32) -> Result<sponsor::Model, AppError> {
    sponsor::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sponsor not found".into()))
}

use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::highlight;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::highlight::{
    HighlightRequest, HighlightResponse, UpdateHighlightRequest, validate_highlight,
};
use crate::models::shared::{
    IdQuery, ListQuery, MessageResponse, Paginated, StatusMessage, require_body_id,
};
use crate::state::AppState;
use crate::utils::listing::{ListSpec, fetch_page};

const HIGHLIGHT_LIST: ListSpec<highlight::Column> = ListSpec {
    search: &[highlight::Column::Title, highlight::Column::Content],
    sort: &[
        ("id", highlight::Column::Id),
        ("title", highlight::Column::Title),
        ("created_at", highlight::Column::CreatedAt),
        ("created_by", highlight::Column::CreatedBy),
    ],
    default_sort: highlight::Column::CreatedAt,
    tie_breaker: highlight::Column::Id,
};

const HOME_FEED_SIZE: u64 = 4;

#[utoipa::path(
    get,
    path = "/highlights",
    tag = "Highlights",
    operation_id = "listHighlights",
    summary = "List highlights",
    description = "Searches `title` and `content`. `sortBy` accepts `id`, `title`, `created_at` and `created_by`.",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of highlights", body = Paginated<HighlightResponse>),
        (status = 400, description = "Missing or invalid page/limit (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_highlights(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<HighlightResponse>>, AppError> {
    let params = query.validate()?;
    let page = fetch_page(
        &state.db,
        highlight::Entity::find(),
        &HIGHLIGHT_LIST,
        &params,
    )
    .await?;
    Ok(Json(page.map(HighlightResponse::from)))
}

#[utoipa::path(
    get,
    path = "/highlights/getbyid",
    tag = "Highlights",
    operation_id = "getHighlight",
    summary = "Get a highlight by ID",
    params(IdQuery),
    responses(
        (status = 200, description = "Highlight", body = MessageResponse<HighlightResponse>),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Highlight not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_highlight(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse<HighlightResponse>>, AppError> {
    let id = query.require()?;
    let model = find_highlight(&state.db, id).await?;
    Ok(Json(MessageResponse::success(model.into())))
}

#[utoipa::path(
    post,
    path = "/highlights/create",
    tag = "Highlights",
    operation_id = "createHighlight",
    summary = "Create a highlight",
    request_body = HighlightRequest,
    responses(
        (status = 200, description = "Highlight created", body = MessageResponse<HighlightResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_highlight(
    State(state): State<AppState>,
    AppJson(payload): AppJson<HighlightRequest>,
) -> Result<Json<MessageResponse<HighlightResponse>>, AppError> {
    validate_highlight(&payload)?;

    let model = highlight::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        image: Set(payload.image),
        content: Set(payload.content),
        created_by: Set(payload.created_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(id = model.id, "Highlight created");
    Ok(Json(MessageResponse::new(
        "Highlight created successfully",
        model.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/highlights/update",
    tag = "Highlights",
    operation_id = "updateHighlight",
    summary = "Update a highlight",
    description = "The target id is read from the request body.",
    request_body = UpdateHighlightRequest,
    responses(
        (status = 200, description = "Highlight updated", body = MessageResponse<HighlightResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Highlight not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id = ?payload.id))]
pub async fn update_highlight(
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateHighlightRequest>,
) -> Result<Json<MessageResponse<HighlightResponse>>, AppError> {
    let id = require_body_id(payload.id)?;
    let fields = payload.fields;
    validate_highlight(&fields)?;

    let mut active: highlight::ActiveModel = find_highlight(&state.db, id).await?.into();
    active.title = Set(fields.title.trim().to_string());
    active.image = Set(fields.image);
    active.content = Set(fields.content);
    active.created_by = Set(fields.created_by);
    let model = active.update(&state.db).await?;

    Ok(Json(MessageResponse::new(
        "Highlight updated successfully",
        model.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/highlights/delete",
    tag = "Highlights",
    operation_id = "deleteHighlight",
    summary = "Delete a highlight",
    params(IdQuery),
    responses(
        (status = 200, description = "Highlight deleted", body = StatusMessage),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Highlight not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn delete_highlight(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let id = query.require()?;

    let result = highlight::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Highlight not found".into()));
    }

    info!(id, "Highlight deleted");
    Ok(Json(StatusMessage::new("Highlight deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/highlights_home",
    tag = "Highlights",
    operation_id = "highlightsHome",
    summary = "Latest highlights for the home page",
    responses(
        (status = 200, description = "The four newest highlights", body = MessageResponse<Vec<HighlightResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn highlights_home(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse<Vec<HighlightResponse>>>, AppError> {
    let data = highlight::Entity::find()
        .order_by_desc(highlight::Column::CreatedAt)
        .order_by_desc(highlight::Column::Id)
        .limit(Some(HOME_FEED_SIZE))
        .all(&state.db)
        .await?;

    Ok(Json(MessageResponse::success(
        data.into_iter().map(Into::into).collect(),
    )))
}

async fn find_highlight<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<highlight::Model, AppError> {
    highlight::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Highlight not found".into()))
}

use axum::Json;
use axum::extract::{Query, State};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::news;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::news::{NewsRequest, NewsResponse, validate_news};
use crate::models::shared::{IdQuery, ListQuery, MessageResponse, Paginated, StatusMessage};
use crate::state::AppState;
use crate::utils::listing::{ListSpec, fetch_page};

const NEWS_LIST: ListSpec<news::Column> = ListSpec {
    search: &[news::Column::Title, news::Column::Detail],
    sort: &[
        ("id", news::Column::Id),
        ("title", news::Column::Title),
        ("created_at", news::Column::CreatedAt),
        ("created_by", news::Column::CreatedBy),
    ],
    default_sort: news::Column::CreatedAt,
    tie_breaker: news::Column::Id,
};

/// Articles shown on the landing page.
const HOME_FEED_SIZE: u64 = 4;

#[utoipa::path(
    get,
    path = "/news",
    tag = "News",
    operation_id = "listNews",
    summary = "List news with pagination, search and sorting",
    description = "Searches `title` and `detail` case-insensitively. `sortBy` accepts `id`, `title`, `created_at` and `created_by`; anything else sorts by `created_at`.",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of news", body = Paginated<NewsResponse>),
        (status = 400, description = "Missing or invalid page/limit (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<NewsResponse>>, AppError> {
    let params = query.validate()?;
    let page = fetch_page(&state.db, news::Entity::find(), &NEWS_LIST, &params).await?;
    Ok(Json(page.map(NewsResponse::from)))
}

#[utoipa::path(
    get,
    path = "/news/getbyid",
    tag = "News",
    operation_id = "getNews",
    summary = "Get a news article by ID",
    params(IdQuery),
    responses(
        (status = 200, description = "News article", body = MessageResponse<NewsResponse>),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "News not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn get_news(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<MessageResponse<NewsResponse>>, AppError> {
    let id = query.require()?;
    let model = find_news(&state.db, id).await?;
    Ok(Json(MessageResponse::success(model.into())))
}

#[utoipa::path(
    post,
    path = "/news/create",
    tag = "News",
    operation_id = "createNews",
    summary = "Create a news article",
    request_body = NewsRequest,
    responses(
        (status = 200, description = "News created", body = MessageResponse<NewsResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title))]
pub async fn create_news(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewsRequest>,
) -> Result<Json<MessageResponse<NewsResponse>>, AppError> {
    validate_news(&payload)?;

    let model = news::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        image: Set(payload.image),
        detail: Set(payload.detail),
        content: Set(payload.content),
        created_by: Set(payload.created_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(id = model.id, "News created");
    Ok(Json(MessageResponse::new(
        "News created successfully",
        model.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/news/update",
    tag = "News",
    operation_id = "updateNews",
    summary = "Update a news article",
    description = "Overwrites title, image, detail, content and created_by. The target id is passed as `?id=`.",
    params(IdQuery),
    request_body = NewsRequest,
    responses(
        (status = 200, description = "News updated", body = MessageResponse<NewsResponse>),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "News not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query, payload))]
pub async fn update_news(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    AppJson(payload): AppJson<NewsRequest>,
) -> Result<Json<MessageResponse<NewsResponse>>, AppError> {
    let id = query.require()?;
    validate_news(&payload)?;

    let mut active: news::ActiveModel = find_news(&state.db, id).await?.into();
    active.title = Set(payload.title.trim().to_string());
    active.image = Set(payload.image);
    active.detail = Set(payload.detail);
    active.content = Set(payload.content);
    active.created_by = Set(payload.created_by);
    let model = active.update(&state.db).await?;

    Ok(Json(MessageResponse::new(
        "News updated successfully",
        model.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/news/delete",
    tag = "News",
    operation_id = "deleteNews",
    summary = "Delete a news article",
    params(IdQuery),
    responses(
        (status = 200, description = "News deleted", body = StatusMessage),
        (status = 400, description = "Missing or invalid id (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "News not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn delete_news(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let id = query.require()?;

    let result = news::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("News not found".into()));
    }

    info!(id, "News deleted");
    Ok(Json(StatusMessage::new("News deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/news_home",
    tag = "News",
    operation_id = "newsHome",
    summary = "Latest news for the home page",
    responses(
        (status = 200, description = "The four newest articles", body = MessageResponse<Vec<NewsResponse>>),
    ),
)]
#[instrument(skip(state))]
pub async fn news_home(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse<Vec<NewsResponse>>>, AppError> {
    let data = news::Entity::find()
        .order_by_desc(news::Column::CreatedAt)
        .order_by_desc(news::Column::Id)
        .limit(Some(HOME_FEED_SIZE))
        .all(&state.db)
        .await?;

    Ok(Json(MessageResponse::success(
        data.into_iter().map(Into::into).collect(),
    )))
}

async fn find_news<C: ConnectionTrait>(db: &C, id: i32) -> Result<news::Model, AppError> {
    news::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("News not found".into()))
}

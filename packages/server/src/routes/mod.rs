use axum::middleware::from_fn_with_state;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::middleware::auth::require_access_token;
use crate::state::AppState;

/// Every `/api` route. Profile and user management sit behind the access-token check.
pub fn api_routes(state: &AppState) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(auth_routes())
        .merge(news_routes())
        .merge(highlight_routes())
        .merge(footer_routes())
        .merge(sponsor_routes())
        .merge(permission_routes())
        .merge(role_routes())
        .merge(
            protected_routes()
                .route_layer(from_fn_with_state(state.clone(), require_access_token)),
        )
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::refresh))
}

fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::profile))
        .routes(routes!(handlers::user::list_users))
        .routes(routes!(handlers::user::get_user))
        .routes(routes!(handlers::user::update_user))
        .routes(routes!(handlers::user::delete_user))
}

fn news_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::news::list_news))
        .routes(routes!(handlers::news::get_news))
        .routes(routes!(handlers::news::create_news))
        .routes(routes!(handlers::news::update_news))
        .routes(routes!(handlers::news::delete_news))
        .routes(routes!(handlers::news::news_home))
}

fn highlight_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::highlight::list_highlights))
        .routes(routes!(handlers::highlight::get_highlight))
        .routes(routes!(handlers::highlight::create_highlight))
        .routes(routes!(handlers::highlight::update_highlight))
        .routes(routes!(handlers::highlight::delete_highlight))
        .routes(routes!(handlers::highlight::highlights_home))
}

fn footer_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::footer::list_footers))
        .routes(routes!(handlers::footer::get_footer))
        .routes(routes!(handlers::footer::create_footer))
        .routes(routes!(handlers::footer::update_footer))
        .routes(routes!(handlers::footer::delete_footer))
        .routes(routes!(handlers::footer::footers_home))
}

fn sponsor_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::sponsor::list_sponsors))
        .routes(routes!(handlers::sponsor::get_sponsor))
        .routes(routes!(handlers::sponsor::create_sponsor))
        .routes(routes!(handlers::sponsor::update_sponsor))
        .routes(routes!(handlers::sponsor::delete_sponsor))
        .routes(routes!(handlers::sponsor::sponsors_home))
}

fn permission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::permission::list_permissions))
        .routes(routes!(handlers::permission::get_permission))
        .routes(routes!(handlers::permission::create_permission))
        .routes(routes!(handlers::permission::update_permission))
        .routes(routes!(handlers::permission::delete_permission))
}

fn role_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::role::list_roles,
            handlers::role::create_role,
            handlers::role::update_role,
            handlers::role::delete_role
        ))
        .routes(routes!(handlers::role::get_role))
        .routes(routes!(handlers::role::role_permissions))
        .routes(routes!(handlers::role::assign_permissions))
}

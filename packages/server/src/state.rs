use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

/// Everything a handler may touch. Built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// Outbound client for the prerender delegation.
    pub http: reqwest::Client,
}

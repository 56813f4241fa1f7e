use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}

/// Secrets and lifetimes for the access and refresh tokens.
/// Each token kind is signed and verified with its own secret.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,
}

fn default_access_ttl() -> i64 {
    15 * 60
}
fn default_refresh_ttl() -> i64 {
    7 * 24 * 60 * 60
}

/// Crawler delegation to an external prerendering service.
#[derive(Debug, Deserialize, Clone)]
pub struct PrerenderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_prerender_url")]
    pub service_url: String,
    /// Sent as `X-Prerender-Token`. Never hard-code this.
    #[serde(default)]
    pub token: Option<String>,
}

fn default_prerender_url() -> String {
    "https://service.prerender.io".into()
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_url: default_prerender_url(),
            token: None,
        }
    }
}

/// Credentials of the account created by the startup seeder.
#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    #[serde(default = "default_owner_username")]
    pub owner_username: String,
    #[serde(default = "default_owner_password")]
    pub owner_password: String,
}

fn default_owner_username() -> String {
    "owner".into()
}
fn default_owner_password() -> String {
    "owner123".into()
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            owner_username: default_owner_username(),
            owner_password: default_owner_password(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub prerender: PrerenderConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CMS__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("CMS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}

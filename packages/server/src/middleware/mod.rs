pub mod auth;
pub mod prerender;

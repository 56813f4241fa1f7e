pub mod auth;
pub mod footer;
pub mod highlight;
pub mod news;
pub mod permission;
pub mod role;
pub mod shared;
pub mod sponsor;
pub mod user;

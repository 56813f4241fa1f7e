pub mod footer;
pub mod highlight;
pub mod news;
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod sponsor;
pub mod user;

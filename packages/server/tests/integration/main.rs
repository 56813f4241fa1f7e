mod auth;
mod content;
mod news;
mod permission;
mod role;
mod router;

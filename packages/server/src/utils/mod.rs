pub mod hash;
pub mod jwt;
pub mod listing;
pub mod rbac;

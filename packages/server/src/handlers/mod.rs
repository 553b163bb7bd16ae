pub mod artist;
pub mod auth;
pub mod user;

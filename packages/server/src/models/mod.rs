pub mod artist;
pub mod auth;
pub mod shared;
pub mod user;

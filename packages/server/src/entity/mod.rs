pub mod artist;
pub mod user;
pub mod user_artist;

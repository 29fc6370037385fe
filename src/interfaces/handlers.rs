pub mod admin_content;
pub mod artworks;
pub mod auth;
pub mod content;
pub mod home;
pub mod json_error;
pub mod mail;
pub mod media;
pub mod rate_limit;
pub mod subscribers;
pub mod system;

pub mod artworks;
pub mod auth;
pub mod content;
pub mod extractors;
pub mod mail;
pub mod media;
pub mod notify;
pub mod seed;
pub mod subscribers;

pub mod artwork;
pub mod content;
pub mod subscriber;
pub mod token;
pub mod user;

pub mod artwork;
pub mod content;
pub mod mail;
pub mod option_fields;
pub mod response;
pub mod subscriber;
pub mod token;
pub mod user;

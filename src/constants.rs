use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Cookie carrying the admin bearer token for browser clients.
pub const ADMIN_TOKEN_COOKIE: &str = "adminToken";

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = ["png", "jpg", "jpeg", "webp", "gif"];

pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub const DB_FALLBACK_WARNING: &str = "Database connection failed, returning default data";
pub const DB_FALLBACK_EMPTY_WARNING: &str = "Database connection failed, returning empty data";

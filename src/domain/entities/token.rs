use serde::{Serialize, Deserialize};

use crate::entities::user::PublicUser;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub user: PublicUser,
}

impl AuthResponse {
    pub fn new(token: String, user: PublicUser) -> Self {
        AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            user,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

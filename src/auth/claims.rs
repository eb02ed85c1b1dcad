use serde::{Deserialize, Serialize};

/// Claims of an access token issued by the hosted auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Auth user id
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,

    #[serde(default)]
    pub email: Option<String>,

    /// Database role of the session (`authenticated`), not the marketplace role
    #[serde(default)]
    pub role: Option<String>,
}

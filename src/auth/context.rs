use super::Claims;
use uuid::Uuid;

/// Verified identity of the caller. Opaque to the marketplace: it says who
/// is calling, not what they may do; that comes from their profile.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Raw JWT, forwarded to the storage API so uploads run as the caller
    token: String,
}

impl AuthContext {
    pub fn from_claims_with_token(claims: &Claims, token: &str) -> Result<Self, &'static str> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| "ID de usuario inválido en el token")?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            token: token.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            aud: "authenticated".to_string(),
            iss: "http://localhost:54321/auth/v1".to_string(),
            iat: 0,
            exp: 0,
            email: Some("ana@example.com".to_string()),
            role: Some("authenticated".to_string()),
        }
    }

    #[test]
    fn test_context_from_valid_sub() {
        let id = Uuid::new_v4();
        let ctx = AuthContext::from_claims_with_token(&claims(&id.to_string()), "tok").unwrap();
        assert_eq!(ctx.user_id, id);
        assert_eq!(ctx.token(), "tok");
    }

    #[test]
    fn test_context_rejects_non_uuid_sub() {
        assert!(AuthContext::from_claims_with_token(&claims("anon"), "tok").is_err());
    }
}

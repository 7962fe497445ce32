//! Caller identity: bearer token claims and the per-request caller

use serde::{Deserialize, Serialize};

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    /// Granted permissions, e.g. `catalog.can_mark_returned`
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Who is making the request. Threaded explicitly into every gated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(UserClaims),
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::User(_))
    }

    pub fn user_id(&self) -> Option<i32> {
        match self {
            Caller::User(claims) => Some(claims.user_id),
            Caller::Anonymous => None,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        match self {
            Caller::User(claims) => claims.has_permission(permission),
            Caller::Anonymous => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(permissions: &[&str], exp: i64) -> UserClaims {
        UserClaims {
            sub: "reader".to_string(),
            user_id: 42,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_roundtrip_keeps_permissions() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let original = claims(&["catalog.can_mark_returned"], exp);
        let token = original.create_token("secret").unwrap();

        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed, original);
        assert!(parsed.has_permission("catalog.can_mark_returned"));
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let exp = (Utc::now() + Duration::hours(1)).timestamp();
        let token = claims(&[], exp).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());

        let expired = (Utc::now() - Duration::hours(2)).timestamp();
        let token = claims(&[], expired).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }

    #[test]
    fn anonymous_caller_has_nothing() {
        let caller = Caller::Anonymous;
        assert!(!caller.is_authenticated());
        assert_eq!(caller.user_id(), None);
        assert!(!caller.has_permission("catalog.can_mark_returned"));
    }
}

//! JWT issuance and verification (HS256).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::store::UserRole;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id.
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    /// Tokens without a role act as plain users.
    #[serde(default)]
    pub role: UserRole,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_secs: i64,
}

impl Jwt {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            expiry_secs: config.expiry.as_secs() as i64,
        }
    }

    /// Issue a token for a user.
    pub fn issue(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            user_id,
            email: email.to_string(),
            role,
            exp: Utc::now().timestamp() + self.expiry_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn jwt(secret: &str) -> Jwt {
        Jwt::new(&JwtConfig {
            secret: secret.to_string(),
            expiry: Duration::from_secs(3600),
        })
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let jwt = jwt("secret");
        let user_id = Uuid::new_v4();

        let token = jwt.issue(user_id, "a@b.com", UserRole::Admin).unwrap();
        let claims = jwt.verify(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let token = jwt("secret").issue(Uuid::new_v4(), "a@b.com", UserRole::User).unwrap();

        assert!(jwt("other-secret").verify(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let jwt = jwt("secret");
        let claims = Claims {
            user_id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            role: UserRole::User,
            // Past the default validation leeway.
            exp: Utc::now().timestamp() - 120,
        };
        let token =
            jsonwebtoken::encode(&Header::default(), &claims, &jwt.encoding).unwrap();

        assert!(jwt.verify(&token).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(jwt("secret").verify("not-a-token").is_err());
    }
}

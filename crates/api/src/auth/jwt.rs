//! Bearer token signing and verification.
//!
//! Tokens are HS256 JWTs issued by the account service that fronts liftcycle.
//! This service only verifies them; [`generate_access_token`] exists for
//! local tooling and the integration tests.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use liftcycle_core::roles::Role;
use liftcycle_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ISSUER: &str = "liftcycle";

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

/// Payload of a liftcycle access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The lifter's user id.
    pub sub: DbId,
    /// `"admin"` or `"user"`. Parsed into [`Role`] by the auth extractor.
    pub role: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Load token settings from the environment.
    ///
    /// | Env Var                    | Required | Default     |
    /// |----------------------------|----------|-------------|
    /// | `JWT_SECRET`               | **yes**  | --          |
    /// | `JWT_ISSUER`               | no       | `liftcycle` |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`        |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            issuer,
            access_token_expiry_mins,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

/// Sign an access token for a lifter.
pub fn generate_access_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.as_str().to_string(),
        iss: config.issuer.clone(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature, expiry and issuer, returning the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "liftcycle-test-secret-long-enough".to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_verifies() {
        let config = config();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, Role::Admin, &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iss, "liftcycle");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config();
        let now = chrono::Utc::now().timestamp();
        // Past the 60-second default leeway.
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: "user".to_string(),
            iss: DEFAULT_ISSUER.to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        assert!(validate_token(&sign(&claims, &config.secret), &config).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: "user".to_string(),
            iss: "some-other-app".to_string(),
            exp: now + 600,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        assert!(validate_token(&sign(&claims, &config.secret), &config).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(Uuid::new_v4(), Role::User, &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            ..config()
        };

        assert!(validate_token(&token, &other).is_err());
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

/// Issues and checks bearer tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<String, AuthError>;
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// HS256 JWT issuer.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl,
        }
    }

    pub fn from_settings(s: &configs::TokenSettings) -> Result<Self, AuthError> {
        let ttl = i64::try_from(s.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| AuthError::Token(format!("token ttl of {}s is out of range", s.ttl_secs)))?;
        Ok(Self::new(&s.secret, s.issuer.clone(), ttl))
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Token("token lifetime out of range".into()))?;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&JwtHeader::default(), &claims, &self.encoding).map_err(|e| AuthError::Token(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[self.issuer.as_str()]);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Token(e.to_string()))
    }
}

// Issues and verifies the bearer tokens handed out by POST /jwt

use std::fmt;

use axum::http::HeaderValue;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::{ApiError, ApiResult};

/// Claims carried by every token. Whatever else the client sent to
/// `/jwt` rides along in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_seconds: i64::try_from(ttl_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Signs the client payload. `email` is required because every gate
    /// downstream keys on it.
    pub fn issue(&self, mut payload: Map<String, Value>) -> ApiResult<String> {
        let email: String = match payload.remove("email") {
            Some(Value::String(email)) if !email.trim().is_empty() => email,
            _ => return Err(ApiError::BadRequest("Email is required".to_string())),
        };
        payload.remove("iat");
        payload.remove("exp");

        let now: i64 = Utc::now().timestamp();
        let claims: Claims = Claims {
            email,
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
            extra: payload,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Any signature, expiry or shape problem is a 401.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                ApiError::unauthorized()
            })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(header: Option<&HeaderValue>) -> Option<&str> {
    let value: &str = header?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token: &str = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest};

use super::errors::ApiError;
use crate::catalog::AuthContext;

// ============================================================================
// Bearer Authentication
// ============================================================================
//
// Tokens are not verified beyond shape and a minimum length. The raw header
// is kept so it can be forwarded to the product service.
//
// ============================================================================

pub const MIN_TOKEN_LEN: usize = 20;

/// Extractor for a well-formed `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct BearerAuth {
    header: String,
}

impl BearerAuth {
    pub fn parse(header: Option<&str>) -> Result<Self, ApiError> {
        let header = match header {
            Some(value) if !value.is_empty() => value,
            _ => {
                return Err(ApiError::unauthorized(
                    "MISSING_TOKEN",
                    "Authorization header is required",
                ))
            }
        };

        let token = match header.split(' ').collect::<Vec<_>>().as_slice() {
            ["Bearer", token] => *token,
            _ => {
                return Err(ApiError::unauthorized(
                    "INVALID_TOKEN_FORMAT",
                    "Authorization header must be in format: Bearer {token}",
                ))
            }
        };

        if token.is_empty() {
            return Err(ApiError::unauthorized("EMPTY_TOKEN", "Token cannot be empty"));
        }
        if token.len() < MIN_TOKEN_LEN {
            return Err(ApiError::unauthorized("INVALID_TOKEN", "Invalid or expired token"));
        }

        Ok(Self {
            header: header.to_string(),
        })
    }

    /// Credentials to forward to the catalog
    pub fn context(&self) -> AuthContext {
        AuthContext {
            authorization: Some(self.header.clone()),
        }
    }
}

impl FromRequest for BearerAuth {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());
        ready(Self::parse(header))
    }
}

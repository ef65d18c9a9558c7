use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::Error as JwtError,
};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

/// Bearer tokens stay valid for a week before a fresh login is required.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims carried by the bearer token and extracted on authenticated routes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// User id.
    pub sub: i32,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn new(user_id: i32, email: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn to_token(&self, secret: &str) -> Result<String, JwtError> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_token(token: &str, secret: &str) -> Result<Self, JwtError> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            return ready(Err(ErrorUnauthorized("authentication not configured")));
        };
        let token = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        match token {
            Some(token) => match Self::from_token(token, config.jwt_secret()) {
                Ok(claims) => ready(Ok(claims)),
                Err(_) => ready(Err(ErrorUnauthorized("invalid token"))),
            },
            None => ready(Err(ErrorUnauthorized("missing bearer token"))),
        }
    }
}

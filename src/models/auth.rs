//! Authenticated employee extracted from the identity cookie.
//!
//! The auth service stores a signed JWT as the identity id. The same token is
//! forwarded to the accounting backend as a bearer credential.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
    /// Raw token the claims were decoded from.
    #[serde(skip)]
    pub token: String,
}

impl AuthenticatedUser {
    /// Decodes and validates an HS256 token signed with `secret`.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<AuthenticatedUser>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        let mut user = data.claims;
        user.token = token.to_string();
        Ok(user)
    }

    /// Signs the claims with `secret`.
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("Unauthorized"))?;
    let token = identity
        .id()
        .map_err(|_| ErrorUnauthorized("Unauthorized"))?;
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorInternalServerError("Server configuration is missing"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected identity token: {err}");
        ErrorUnauthorized("Unauthorized")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "17".to_string(),
            email: "jamie@books.example".to_string(),
            name: "Jamie".to_string(),
            roles: vec!["bookkeeping".to_string()],
            exp: 4_102_444_800,
            token: String::new(),
        }
    }

    #[test]
    fn token_round_trip_keeps_claims_and_raw_token() {
        let user = sample_user();
        let token = user.to_jwt("secret").unwrap();

        let decoded = AuthenticatedUser::from_jwt(&token, "secret").unwrap();
        assert_eq!(decoded.sub, user.sub);
        assert_eq!(decoded.roles, user.roles);
        assert_eq!(decoded.token, token);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sample_user().to_jwt("secret").unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn role_lookup() {
        let user = sample_user();
        assert!(user.has_role("bookkeeping"));
        assert!(!user.has_role("admin"));
    }
}

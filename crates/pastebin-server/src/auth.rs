//! Bearer-token identity: HS256 JWT issuing and verification, and the
//! [`Caller`] extractor.

use std::convert::Infallible;

use axum::{
  extract::FromRequestParts,
  http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pastebin_core::identity::CallerIdentity;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::AppState;

/// JWT claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  /// The caller's user id.
  pub sub:   String,
  pub email: String,
  /// Expiration, seconds since the Unix epoch.
  pub exp:   i64,
}

/// Signs and verifies bearer tokens with a shared HS256 secret.
pub struct JwtIdentity {
  encoding: EncodingKey,
  decoding: DecodingKey,
}

impl JwtIdentity {
  pub fn new(secret: &str) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
    }
  }

  /// Sign a token for `identity`, valid for `ttl`.
  pub fn issue(
    &self,
    identity: &CallerIdentity,
    ttl: Duration,
  ) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
      sub:   identity.user_id.to_string(),
      email: identity.email.clone(),
      exp:   (Utc::now() + ttl).timestamp(),
    };
    encode(&Header::default(), &claims, &self.encoding)
  }

  /// The identity carried by `token`, or `None` if the token is malformed,
  /// expired, or signed with another secret.
  pub fn verify(&self, token: &str) -> Option<CallerIdentity> {
    let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
      .inspect_err(|e| debug!(error = %e, "rejected bearer token"))
      .ok()?
      .claims;
    let user_id = Uuid::parse_str(&claims.sub).ok()?;
    Some(CallerIdentity::new(user_id, claims.email))
  }
}

/// The optional identity of whoever sent the request.
///
/// Never rejects: a missing or invalid `Authorization: Bearer` header yields
/// an anonymous caller, and the engine decides what anonymous callers may do.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<CallerIdentity>);

impl Caller {
  pub fn identity(&self) -> Option<&CallerIdentity> { self.0.as_ref() }
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let identity = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "))
      .and_then(|token| state.identity.verify(token.trim()));
    Ok(Caller(identity))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn alice() -> CallerIdentity {
    CallerIdentity::new(Uuid::new_v4(), "alice@example.com")
  }

  #[test]
  fn issued_tokens_verify() {
    let jwt = JwtIdentity::new("secret");
    let who = alice();
    let token = jwt.issue(&who, Duration::hours(1)).unwrap();
    assert_eq!(jwt.verify(&token), Some(who));
  }

  #[test]
  fn wrong_secret_is_anonymous() {
    let token = JwtIdentity::new("one").issue(&alice(), Duration::hours(1)).unwrap();
    assert_eq!(JwtIdentity::new("two").verify(&token), None);
  }

  #[test]
  fn expired_token_is_anonymous() {
    let jwt = JwtIdentity::new("secret");
    let token = jwt.issue(&alice(), Duration::hours(-2)).unwrap();
    assert_eq!(jwt.verify(&token), None);
  }

  #[test]
  fn garbage_is_anonymous() {
    let jwt = JwtIdentity::new("secret");
    assert_eq!(jwt.verify(""), None);
    assert_eq!(jwt.verify("a.b.c"), None);
  }

  #[test]
  fn non_uuid_subject_is_anonymous() {
    let jwt = JwtIdentity::new("secret");
    let claims = Claims {
      sub:   "not-a-uuid".to_owned(),
      email: "x@example.com".to_owned(),
      exp:   (Utc::now() + Duration::hours(1)).timestamp(),
    };
    let token = encode(&Header::default(), &claims, &jwt.encoding).unwrap();
    assert_eq!(jwt.verify(&token), None);
  }
}

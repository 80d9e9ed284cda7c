//! Session verification and the request extractors built on it.
//!
//! A session token is `<user_id>.<expires_unix>.<hex hmac-sha256>`, carried in
//! the `auth-token` cookie or an `Authorization: Bearer` header. Issuing the
//! cookie at login belongs to the auth layer in front of this service; only
//! [`SessionSigner::issue`] is provided so that layer and tests can mint
//! tokens with the shared secret.

use std::fmt;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "auth-token";
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
    ttl: Duration,
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSigner")
            .field("mac", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionSigner {
    pub fn new(secret: &SecretString) -> Result<Self, ConfigError> {
        let mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SESSION_SECRET".to_string(), e.to_string())
            })?;
        Ok(Self {
            mac,
            ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        })
    }

    pub fn issue(&self, user_id: Uuid) -> String {
        self.issue_until(user_id, Utc::now() + self.ttl)
    }

    pub fn issue_until(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> String {
        let payload = format!("{}.{}", user_id, expires_at.timestamp());
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        format!("{}.{}", payload, hex::encode(mac.finalize().into_bytes()))
    }

    /// Returns the user id of a well-formed, correctly signed, unexpired
    /// token.
    pub fn verify(&self, token: &str) -> Result<Uuid, DomainError> {
        let (payload, signature) = token
            .rsplit_once('.')
            .ok_or(DomainError::Unauthenticated)?;
        let signature = hex::decode(signature).map_err(|_| DomainError::Unauthenticated)?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| DomainError::Unauthenticated)?;

        let (user_id, expires) = payload
            .split_once('.')
            .ok_or(DomainError::Unauthenticated)?;
        let expires: i64 = expires.parse().map_err(|_| DomainError::Unauthenticated)?;
        if Utc::now().timestamp() >= expires {
            return Err(DomainError::Unauthenticated);
        }
        Uuid::parse_str(user_id).map_err(|_| DomainError::Unauthenticated)
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
}

/// `Ok(None)` when no token was sent; an error when a token was sent but does
/// not verify.
fn session_user(req: &HttpRequest) -> Result<Option<Uuid>, AppError> {
    let Some(token) = session_token(req) else {
        return Ok(None);
    };
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;
    state.sessions.verify(&token).map(Some).map_err(AppError::from)
}

/// The user behind a valid session. Rejects the request with 401 otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            session_user(req)
                .and_then(|u| u.map(AuthenticatedUser).ok_or(AppError::Unauthorized)),
        )
    }
}

/// The session user when one is present. An invalid token counts as absent.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<Uuid>);

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(session_user(req).ok().flatten())))
    }
}

/// The single shared back-office password.
#[derive(Debug, Clone)]
pub struct AdminPassword(pub SecretString);

/// Present on requests carrying the admin password header.
#[derive(Debug, Clone, Copy)]
pub struct Admin;

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl FromRequest for Admin {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::Internal(
                "application state not configured".to_string(),
            )));
        };
        let supplied = req
            .headers()
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let expected = state.admin_password.0.expose_secret().as_bytes();
        if constant_time_eq(supplied.as_bytes(), expected) {
            ready(Ok(Admin))
        } else {
            log::warn!("Rejected admin request to {}", req.path());
            ready(Err(AppError::Unauthorized))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new(&SecretString::from(
            "0123456789abcdef0123456789abcdef".to_string(),
        ))
        .expect("signer")
    }

    #[test]
    fn issued_token_verifies() {
        let s = signer();
        let user = Uuid::new_v4();
        assert_eq!(s.verify(&s.issue(user)).expect("valid"), user);
    }

    #[test]
    fn expired_token_is_rejected() {
        let s = signer();
        let token = s.issue_until(Uuid::new_v4(), Utc::now() - Duration::seconds(1));
        assert!(matches!(s.verify(&token), Err(DomainError::Unauthenticated)));
    }

    #[test]
    fn tampered_user_id_is_rejected() {
        let s = signer();
        let token = s.issue(Uuid::new_v4());
        let (_, rest) = token.split_once('.').expect("dotted");
        let forged = format!("{}.{}", Uuid::new_v4(), rest);
        assert!(s.verify(&forged).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = SessionSigner::new(&SecretString::from(
            "ffffffffffffffffffffffffffffffff".to_string(),
        ))
        .expect("signer");
        let token = other.issue(Uuid::new_v4());
        assert!(signer().verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let s = signer();
        for t in ["", "abc", "a.b.c", "..", "x.1.zz"] {
            assert!(s.verify(t).is_err(), "{t:?} should not verify");
        }
    }

    #[test]
    fn constant_time_eq_compares_contents() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secreT"));
        assert!(!constant_time_eq(b"secret", b"secret!"));
    }
}

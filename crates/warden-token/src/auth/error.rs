use axum::http::StatusCode;
use axum_thiserror::ErrorStatus;
use thiserror::Error;

use crate::error::JWTError;

/// Token handling failures, each mapped to the status the caller sees.
///
/// Everything about the caller's own token answers 401; a verified token
/// that lacks the required role answers 403; only a JWKS fetch failure is a
/// server-side fault.
#[derive(Debug, Error, ErrorStatus)]
pub enum AuthError {
    #[error("Could not fetch the JWK set. Reason: {0}")]
    #[status(StatusCode::INTERNAL_SERVER_ERROR)]
    JwkSetFetch(#[from] reqwest::Error),

    #[error("No JWK in the set matches the token")]
    #[status(StatusCode::UNAUTHORIZED)]
    NoMatchingJwk,

    #[error("The 'Authorization' header was not present on the request")]
    #[status(StatusCode::UNAUTHORIZED)]
    MissingAuthorizationHeader,

    #[error("The 'Authorization' header was present but its value could not be parsed. Reason: {0}")]
    #[status(StatusCode::UNAUTHORIZED)]
    InvalidAuthorizationHeader(String),

    #[error("The 'Authorization' header did not contain the expected 'Bearer ...token' format")]
    #[status(StatusCode::UNAUTHORIZED)]
    MissingBearerToken,

    #[error("The token could not be decoded. Reason: {0}")]
    #[status(StatusCode::UNAUTHORIZED)]
    DecodeJwt(#[source] JWTError),

    #[error("The token could not be verified. Reason: {0}")]
    #[status(StatusCode::UNAUTHORIZED)]
    VerifyJwt(#[source] JWTError),

    #[error("The token has expired")]
    #[status(StatusCode::UNAUTHORIZED)]
    ExpiredJwt,

    #[error("The token claims could not be parsed. Reason: {0}")]
    #[status(StatusCode::UNAUTHORIZED)]
    ParseClaim(#[source] JWTError),

    #[error("The token does not carry role '{0}'")]
    #[status(StatusCode::FORBIDDEN)]
    MissingRole(String),
}

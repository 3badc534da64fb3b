use base64::DecodeError;
use josekit::JoseError;
use thiserror::Error;

/// Failures while assembling, decoding, or verifying a compact JWS token.
#[derive(Debug, Error)]
pub enum JWTError {
    #[error("token part is not valid base64url")]
    MalformedBase64(#[from] DecodeError),

    #[error("'{0}' is not a three-part compact JWS")]
    MalformedToken(String),

    #[error("token part is not valid json")]
    MalformedJson(#[from] serde_json::Error),

    #[error("could not assemble or sign the token")]
    Creation(#[from] JoseError),

    #[error("could not build a verifier from the JWK")]
    Verifier(JoseError),

    #[error("the signature does not match the key")]
    BadSignature(JoseError),

    #[error("missing claim '{0}'")]
    MissingClaim(&'static str),

    #[error("invalid claim: {0}")]
    InvalidClaim(String),
}

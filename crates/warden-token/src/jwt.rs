use std::time::SystemTime;

use base64::engine::general_purpose::URL_SAFE_NO_PAD as base64_engine;
use base64::Engine;
use josekit::jwk::Jwk;
use josekit::jws::JwsHeader;
use josekit::jwt;
use josekit::jwt::JwtPayload;
use serde_json::{Map, Value};

use super::error::JWTError;
use super::jwk::jwk_ext::JwkExt;

/// A compact-serialized JWS with its decoded header and payload.
///
/// Decoding and verification are separate steps so a key can be selected by
/// `kid` before the signature is checked.
#[derive(Debug, Clone)]
pub struct Jwt {
    header: JwsHeader,
    payload: JwtPayload,
    pub serialized_repr: String,
}

impl Jwt {
    pub fn new(header: JwsHeader, payload: JwtPayload, key: &Jwk) -> Result<Self, JWTError> {
        let signer = key.get_signer()?;
        let serialized_repr = jwt::encode_with_signer(&payload, &header, &*signer).map_err(JWTError::Creation)?;
        Ok(Jwt { header, payload, serialized_repr })
    }

    pub fn verify(&self, key: &Jwk) -> Result<(), JWTError> {
        let verifier = key.get_verifier().map_err(JWTError::Verifier)?;
        let (signed_part, signature) = self
            .serialized_repr
            .rsplit_once('.')
            .ok_or_else(|| JWTError::MalformedToken(self.serialized_repr.clone()))?;
        let decoded_signature = base64_engine.decode(signature)?;
        verifier.verify(signed_part.as_bytes(), &decoded_signature).map_err(JWTError::BadSignature)
    }

    pub fn decode(input: impl AsRef<str>, key: &Jwk) -> Result<Self, JWTError> {
        let jwt = Jwt::decode_without_verification(input)?;
        jwt.verify(key)?;
        Ok(jwt)
    }

    pub fn decode_without_verification(input: impl AsRef<str>) -> Result<Self, JWTError> {
        let str_jwt = input.as_ref();
        let parts: Vec<&str> = str_jwt.split('.').collect();

        if parts.len() != 3 {
            return Err(JWTError::MalformedToken(str_jwt.to_owned()));
        }

        let header_b64 = base64_engine.decode(parts[0])?;
        let header: Map<String, Value> = serde_json::from_slice(&header_b64)?;
        let header = JwsHeader::from_map(header)?;

        let payload_b64 = base64_engine.decode(parts[1])?;
        let payload: Map<String, Value> = serde_json::from_slice(&payload_b64)?;
        let payload = JwtPayload::from_map(payload)?;

        Ok(Jwt { header, payload, serialized_repr: str_jwt.to_owned() })
    }

    pub fn is_expired(&self) -> bool {
        self.payload.expires_at().map_or(true, |exp| exp < SystemTime::now())
    }

    pub fn kid(&self) -> Option<&str> {
        self.header.key_id()
    }

    pub fn payload(&self) -> &JwtPayload {
        &self.payload
    }
}

use std::collections::HashMap;

use josekit::{jwt::JwtPayload, Value};

use crate::error::JWTError;

pub const EMAIL_CLAIM: &str = "email";
pub const ADMIN_ROLE: &str = "admin";

/// The caller identity carried by a verified bearer token.
///
/// Role claims are not predeclared: every top-level boolean claim in the
/// payload counts as a role flag, so a newly granted role shows up here
/// without any code change.
#[derive(Debug, Clone)]
pub struct RoleClaims {
    pub uid: String,
    pub email: Option<String>,
    pub roles: HashMap<String, bool>,
}

impl RoleClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.get(role).copied().unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

impl TryFrom<&JwtPayload> for RoleClaims {
    type Error = JWTError;

    fn try_from(payload: &JwtPayload) -> Result<Self, Self::Error> {
        let uid = payload.subject().ok_or(JWTError::MissingClaim("sub"))?.to_string();

        let email = match payload.claim(EMAIL_CLAIM) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(JWTError::InvalidClaim("email is not a string".to_string())),
            None => None,
        };

        let roles = payload
            .claims_set()
            .iter()
            .filter_map(|(name, value)| match value {
                Value::Bool(flag) => Some((name.clone(), *flag)),
                _ => None,
            })
            .collect();

        Ok(RoleClaims { uid, email, roles })
    }
}

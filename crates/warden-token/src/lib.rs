pub use josekit::{jwk::Jwk, jws::JwsHeader, jwt::JwtPayload, Map, Value};
pub mod auth;
pub mod claim;
pub mod error;
pub mod jwk;
pub mod jwt;

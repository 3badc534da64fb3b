pub mod authenticator;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod jwks_discovery;

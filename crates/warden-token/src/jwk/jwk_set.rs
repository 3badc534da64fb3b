use josekit::jwk::Jwk;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A JWK set as published by an identity platform's JWKS endpoint.
#[derive(Debug, Clone, Default)]
pub struct JwkSet {
    keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    /// Selects a key for a token. Without a `kid` a key can only be picked
    /// when the set is unambiguous.
    pub fn get(&self, kid: Option<&str>) -> Option<&Jwk> {
        match kid {
            Some(kid) => self.keys.iter().find(|key| key.key_id() == Some(kid)),
            None => match self.keys.as_slice() {
                [only] => Some(only),
                _ => None,
            },
        }
    }

    pub fn keys(&self) -> &[Jwk] {
        &self.keys
    }
}

impl<'de> Deserialize<'de> for JwkSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        struct RawJwkSet {
            keys: Vec<Map<String, Value>>,
        }

        let raw = RawJwkSet::deserialize(deserializer)?;
        let keys =
            raw.keys.into_iter().map(Jwk::from_map).collect::<Result<Vec<_>, _>>().map_err(D::Error::custom)?;
        Ok(Self { keys })
    }
}

#[cfg(test)]
mod test {
    use josekit::jwk::Jwk;

    use super::JwkSet;

    fn jwk_with_kid(kid: &str) -> Jwk {
        let mut jwk = Jwk::generate_oct_key(32).expect("generating an oct key should be successful");
        jwk.set_algorithm("HS256");
        jwk.set_key_id(kid);
        jwk
    }

    #[test]
    fn get_by_kid_returns_the_matching_key() {
        let set = JwkSet::new(vec![jwk_with_kid("a"), jwk_with_kid("b")]);

        assert_eq!(set.get(Some("b")).and_then(|key| key.key_id()), Some("b"));
        assert!(set.get(Some("c")).is_none());
    }

    #[test]
    fn get_without_kid_only_resolves_a_single_key_set() {
        let single = JwkSet::new(vec![jwk_with_kid("a")]);
        let multiple = JwkSet::new(vec![jwk_with_kid("a"), jwk_with_kid("b")]);

        assert!(single.get(None).is_some());
        assert!(multiple.get(None).is_none());
    }

    #[test]
    fn deserializing_a_jwks_document_collects_the_keys() {
        let document = serde_json::json!({
            "keys": [
                { "kty": "oct", "alg": "HS256", "kid": "a", "k": "c2VjcmV0LXNlY3JldC1zZWNyZXQ" }
            ]
        });

        let set: JwkSet = serde_json::from_value(document).expect("deserializing should be successful");

        assert_eq!(set.keys().len(), 1);
        assert_eq!(set.get(Some("a")).and_then(|key| key.key_id()), Some("a"));
    }
}

//! Content-based cache keys.

use crate::error::CacheResult;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 hex digest identifying one computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash `stage` together with the JSON form of `args`.
    ///
    /// Maps inside `args` must have a stable iteration order (`BTreeMap`, structs) for
    /// equal inputs to produce equal keys.
    pub fn from_args<A: Serialize + ?Sized>(stage: &str, args: &A) -> CacheResult<Self> {
        let mut hasher = Sha256::new();

        hasher.update(stage.as_bytes());
        hasher.update([0u8]);

        let args_json = serde_json::to_string(args)?;
        hasher.update(args_json.as_bytes());

        let result = hasher.finalize();
        Ok(CacheKey(format!("{:x}", result)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn key_stability() {
        let args = ("air", 8.0, 300.0);
        let a = CacheKey::from_args("cycle", &args).unwrap();
        let b = CacheKey::from_args("cycle", &args).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn key_differs_for_different_inputs() {
        let a = CacheKey::from_args("cycle", &("air", 8.0)).unwrap();
        let b = CacheKey::from_args("cycle", &("air", 9.0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn key_differs_by_stage() {
        let a = CacheKey::from_args("pv", &"abc").unwrap();
        let b = CacheKey::from_args("ts", &"abc").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn map_insertion_order_does_not_matter() {
        let mut first = BTreeMap::new();
        first.insert("t1", 300.0);
        first.insert("p1", 100.0);
        let mut second = BTreeMap::new();
        second.insert("p1", 100.0);
        second.insert("t1", 300.0);
        assert_eq!(
            CacheKey::from_args("cycle", &first).unwrap(),
            CacheKey::from_args("cycle", &second).unwrap()
        );
    }

    #[test]
    fn non_string_map_keys_fail() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), 3.0);
        assert!(CacheKey::from_args("cycle", &map).is_err());
    }
}

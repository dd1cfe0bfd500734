// src/cache.rs
//
// Memoizes processed reports for callers that see the same content several
// times (batch runs, re-plots). Keys are content hashes, so a renamed copy of
// a report is still a hit.

use std::collections::HashMap;

use log::debug;
use sha2::{Digest, Sha256};

use crate::data_input::block_extractor::BlockMarkers;
use crate::error::KcResult;
use crate::pipeline::{process_report, ResultSet};
use crate::test_definition::{Protocol, TestDefinition};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub content_sha256: String,
    pub protocol: Protocol,
    pub markers: BlockMarkers,
}

impl CacheKey {
    pub fn new(content: &str, protocol: Protocol, markers: &BlockMarkers) -> Self {
        Self {
            content_sha256: hash_content(content),
            protocol,
            markers: markers.clone(),
        }
    }
}

/// SHA-256 of the report text as a hex string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Result sets keyed by report content and test definition.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<CacheKey, ResultSet>,
    hits: usize,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the cached result set, processing the report on a miss.
    ///
    /// Failed runs are not cached.
    pub fn get_or_process(
        &mut self,
        content: &str,
        definition: &TestDefinition,
        markers: &BlockMarkers,
    ) -> KcResult<&ResultSet> {
        let key = CacheKey::new(content, definition.protocol, markers);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!("Cache hit for {} ({})", definition.protocol, &key.content_sha256[..12]);
        } else {
            let result = process_report(content, definition, markers)?;
            self.entries.insert(key.clone(), result);
        }
        Ok(&self.entries[&key])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_hex() {
        let h = hash_content("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_key_depends_on_protocol() {
        let markers = BlockMarkers::default();
        assert_ne!(
            CacheKey::new("x", Protocol::Bump, &markers),
            CacheKey::new("x", Protocol::Roll, &markers)
        );
    }

    #[test]
    fn test_failed_run_is_not_cached() {
        let mut cache = ResultCache::new();
        let def = Protocol::Bump.definition();
        assert!(cache
            .get_or_process("no blocks here", def, &BlockMarkers::default())
            .is_err());
        assert!(cache.is_empty());
    }
}

// src/cache.rs

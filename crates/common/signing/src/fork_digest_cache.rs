use std::collections::HashMap;

use alloy_primitives::{B256, aliases::B32};
use keel_consensus_misc::fork_data::ForkData;
use parking_lot::RwLock;

/// Memoized fork digests keyed by the exact (fork version, genesis validators root) pair.
///
/// Safe to share between threads. Entries are never evicted, the key space is bounded by the
/// forks and networks a process actually sees.
#[derive(Debug, Default)]
pub struct ForkDigestCache {
    digests: RwLock<HashMap<(B32, B256), B32>>,
}

impl ForkDigestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&self, current_version: B32, genesis_validators_root: B256) -> B32 {
        let key = (current_version, genesis_validators_root);
        if let Some(digest) = self.digests.read().get(&key) {
            return *digest;
        }

        *self.digests.write().entry(key).or_insert_with(|| {
            ForkData {
                current_version,
                genesis_validators_root,
            }
            .compute_fork_digest()
        })
    }

    pub fn len(&self) -> usize {
        self.digests.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use alloy_primitives::fixed_bytes;

    use super::*;

    #[test]
    fn test_distinct_keys_get_distinct_entries() {
        let cache = ForkDigestCache::new();
        let root = B256::repeat_byte(0x11);

        let genesis = cache.get_or_compute(fixed_bytes!("0x00000000"), root);
        let electra = cache.get_or_compute(fixed_bytes!("0x05000000"), root);
        let other_root = cache.get_or_compute(fixed_bytes!("0x00000000"), B256::ZERO);

        assert_ne!(genesis, electra);
        assert_ne!(genesis, other_root);
        assert_eq!(cache.len(), 3);

        // A hit returns the same digest and adds nothing.
        assert_eq!(cache.get_or_compute(fixed_bytes!("0x00000000"), root), genesis);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_cached_digest_matches_direct_computation() {
        let cache = ForkDigestCache::new();
        let version = fixed_bytes!("0x04000000");
        let root = B256::repeat_byte(0x42);
        let expected = ForkData {
            current_version: version,
            genesis_validators_root: root,
        }
        .compute_fork_digest();
        assert_eq!(cache.get_or_compute(version, root), expected);
    }

    #[test]
    fn test_concurrent_readers() {
        let cache = Arc::new(ForkDigestCache::new());
        let handles = (0..8u8)
            .map(|seed| {
                let cache = cache.clone();
                thread::spawn(move || {
                    (0..64)
                        .map(|_| {
                            cache.get_or_compute(
                                fixed_bytes!("0x05000000"),
                                B256::repeat_byte(seed % 2),
                            )
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            let digests = handle.join().expect("thread finished");
            assert!(digests.windows(2).all(|pair| pair[0] == pair[1]));
        }
        assert_eq!(cache.len(), 2);
    }
}

// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::hash::{hash_bytes, hash_bytes_universal};

/// Hashing context a HAMT is instantiated with: the 32-bit hash the trie
/// routes by, key equivalence, and the rehash used to pick a fresh path
/// after a collision.
///
/// `hash` must be deterministic and agree with `eql`: equal keys produce
/// equal hashes. Lookup and insertion share the same rehash sequence, so a
/// context is free to override [`rehash`](HashContext::rehash) with a
/// stronger mixer without touching the map type.
pub trait HashContext<K: ?Sized> {
    fn hash(&self, key: &K) -> u32;

    /// Key equivalence. `b` is the stored key and `b_index` its position in
    /// the leaf table, for contexts that consult auxiliary state; most
    /// ignore it.
    fn eql(&self, a: &K, b: &K, b_index: u32) -> bool;

    /// Combines the previous attempt's hash with a fresh hash of the key.
    /// On the first attempt `prev` is zero, so the default XOR-combine
    /// reduces to `hash(key)`.
    fn rehash(&self, key: &K, prev: u32) -> u32 {
        prev ^ self.hash(key)
    }
}

/// Byte-string context: byte-wise equality and [`hash_bytes`]. Works for any
/// key that exposes its bytes (`&str`, `String`, `&[u8]`, `Vec<u8>`).
#[derive(Debug, Default, Clone, Copy)]
pub struct Bytes;

impl<K: AsRef<[u8]> + ?Sized> HashContext<K> for Bytes {
    fn hash(&self, key: &K) -> u32 {
        hash_bytes(key.as_ref())
    }

    fn eql(&self, a: &K, b: &K, _b_index: u32) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Byte-string context using [`hash_bytes_universal`], for keys that fare
/// poorly under the plain multiplicative hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct BytesUniversal;

impl<K: AsRef<[u8]> + ?Sized> HashContext<K> for BytesUniversal {
    fn hash(&self, key: &K) -> u32 {
        hash_bytes_universal(key.as_ref())
    }

    fn eql(&self, a: &K, b: &K, _b_index: u32) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Context derived from the key type's own `Hash` and `Eq`. The 64-bit std
/// hash is folded to 32 bits. `DefaultHasher` is deterministic within one
/// build but not guaranteed stable across toolchains, so maps that must
/// match a compile-time table should use [`Bytes`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct Auto;

impl<K: Hash + Eq + ?Sized> HashContext<K> for Auto {
    fn hash(&self, key: &K) -> u32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let h = hasher.finish();
        (h ^ (h >> 32)) as u32
    }

    fn eql(&self, a: &K, b: &K, _b_index: u32) -> bool {
        a == b
    }
}

/// Integer keys hash to themselves (truncated to 32 bits where wider).
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

macro_rules! identity_context {
    ($($t:ty),*) => {
        $(
            impl HashContext<$t> for Identity {
                fn hash(&self, key: &$t) -> u32 {
                    *key as u32
                }

                fn eql(&self, a: &$t, b: &$t, _b_index: u32) -> bool {
                    a == b
                }
            }
        )*
    };
}

identity_context!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rehash_defaults_to_hash_on_first_attempt() {
        let key = "key";
        assert_eq!(Bytes.rehash(&key, 0), Bytes.hash(&key));
        // the XOR-combine cancels on the second attempt
        assert_eq!(Bytes.rehash(&key, Bytes.hash(&key)), 0);
    }

    #[test]
    fn auto_is_deterministic() {
        assert_eq!(Auto.hash(&42u64), Auto.hash(&42u64));
        assert!(Auto.eql(&"a", &"a", 0));
        assert!(!Auto.eql(&"a", &"b", 0));
    }

    #[test]
    fn identity_truncates() {
        assert_eq!(Identity.hash(&7u8), 7);
        assert_eq!(Identity.hash(&(u64::MAX - 6)), u32::MAX - 6);
    }
}

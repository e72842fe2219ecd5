// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use thiserror::Error;

/// HAMT error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Every hash attempt for the key ended on a leaf holding a different
    /// key. Fatal for this key only; the map stays usable.
    #[error("no free hash path for key after {0} attempts")]
    TooManyCollisions(u8),
    /// The descent met a leaf while unconsumed hash bits remained: the
    /// stored key's hash path is a strict prefix of the new key's. The trie
    /// does not split leaves, so the insertion cannot proceed.
    #[error("descent reached a leaf before its hash path was exhausted")]
    LeafOnPath,
    /// Chain offset past the end of an [`IndexList`](crate::IndexList)
    /// sublist. Only reachable through a bitmap/chain inconsistency.
    #[error("offset {offset} out of bounds for chain of length {len}")]
    OffsetOutOfBounds { offset: u32, len: u32 },
}

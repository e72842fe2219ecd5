// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Arena-backed Hash Array Mapped Trie.
//!
//! A [`Hamt`] maps keys to values by consuming a 32-bit hash of the key five
//! bits at a time, descending one 32-way branch per chunk. Unlike a pointer
//! tree, every node lives in one of four flat tables addressed by stable
//! 32-bit ids: a node table of packed branch-or-leaf words, a branch table, a
//! leaf table, and a single [`IndexList`] arena holding every branch's
//! ordered child list. The flat layout keeps a descent step to one word read
//! plus a short chain walk, and makes the whole structure `const`-evaluable.
//!
//! Two construction modes share the representation and the lookup path:
//!
//! * [`Hamt`] grows its tables at runtime through [`Hamt::set`] and
//!   [`Hamt::get_or_put_with`];
//! * [`StaticHamt`] is materialised entirely at compile time from a literal
//!   entry table, most conveniently through the [`static_hamt!`] macro.
//!
//! Hashing is pluggable through the [`HashContext`] trait. When two distinct
//! keys collide on a full hash path, the trie re-routes the key through
//! [`HashContext::rehash`] and retries from the root, up to
//! [`Config::max_collisions`] attempts. There is no leaf splitting; the
//! rehash fallback is the collision strategy.

mod context;
mod error;
mod hamt;
mod hash;
mod hash_bits;
mod link_list;
mod node;
mod static_map;

pub use self::context::{Auto, Bytes, BytesUniversal, HashContext, Identity};
pub use self::error::Error;
pub use self::hamt::{GetOrPut, Hamt};
pub use self::hash::{hash_bytes, hash_bytes_universal};
pub use self::link_list::{IndexList, Link, SubList, NIL};
pub use self::node::{Branch, NodeId};
pub use self::static_map::StaticHamt;

/// Number of hash bits consumed per trie level.
const BIT_WIDTH: u32 = 5;

/// Default number of hash attempts before an operation gives up on a key.
pub const DEFAULT_MAX_COLLISIONS: u8 = 8;

/// Configuration options for a HAMT instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of hash attempts per key. Every attempt after the
    /// first routes the key through [`HashContext::rehash`] to try a fresh
    /// path from the root.
    pub max_collisions: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_collisions: DEFAULT_MAX_COLLISIONS,
        }
    }
}

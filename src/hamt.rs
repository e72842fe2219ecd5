// Copyright 2019-2022 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::borrow::Borrow;

use crate::context::{Auto, HashContext};
use crate::hash_bits::HashBits;
use crate::link_list::{IndexList, Link};
use crate::node::{lookup, Branch, Leaf, NodeId, Tables};
use crate::{Config, Error};

/// Hash array mapped trie over flat node/branch/leaf tables.
///
/// All four storage regions grow monotonically; leaf indices returned by
/// [`get_index`](Hamt::get_index) stay valid for the lifetime of the map.
/// Keys of reference type are borrowed, not copied: a `Hamt<&'a str, V>`
/// cannot outlive the strings it indexes.
///
/// # Examples
///
/// ```
/// use arena_hamt::{Bytes, Hamt};
///
/// let mut map: Hamt<&str, u32, Bytes> = Hamt::new();
/// map.set("let", 1).unwrap();
/// map.set("fn", 2).unwrap();
/// assert_eq!(map.get("let"), Some(&1));
/// assert_eq!(map.get("foo"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Hamt<K, V, C = Auto> {
    nodes: Vec<NodeId>,
    branches: Vec<Branch>,
    leaves: Vec<Leaf<K, V>>,
    children: IndexList<u32>,
    ctx: C,
    conf: Config,
}

/// Outcome of [`Hamt::get_or_put_with`]: whether the key was already
/// present, the stable leaf index, and the value slot to write through.
#[derive(Debug)]
pub struct GetOrPut<'a, V> {
    pub found_existing: bool,
    pub index: u32,
    pub value: &'a mut V,
}

/// One insertion attempt: either the leaf index where the key landed, or the
/// key/value handed back because the attempt's path ended on a different
/// key.
enum Placed<K, V> {
    At(u32),
    Collision(K, V),
}

impl<K, V, C: Default> Hamt<K, V, C> {
    pub fn new() -> Self {
        Self::new_with_context_and_config(C::default(), Config::default())
    }

    pub fn new_with_config(conf: Config) -> Self {
        Self::new_with_context_and_config(C::default(), conf)
    }

    /// Builds a map by inserting every entry in order, pre-reserving
    /// capacity from the iterator's hint. Later duplicates overwrite
    /// earlier values.
    pub fn from_entries<I>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        C: HashContext<K>,
    {
        Self::from_entries_with_context(entries, C::default())
    }
}

impl<K, V, C: Default> Default for Hamt<K, V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> Hamt<K, V, C> {
    pub fn new_with_context(ctx: C) -> Self {
        Self::new_with_context_and_config(ctx, Config::default())
    }

    pub fn new_with_context_and_config(ctx: C, conf: Config) -> Self {
        Self {
            nodes: vec![NodeId::branch(0)],
            branches: vec![Branch::EMPTY],
            leaves: Vec::new(),
            children: IndexList::new(),
            ctx,
            conf,
        }
    }

    /// [`from_entries`](Hamt::from_entries) with an explicit context, for
    /// contexts that carry state.
    pub fn from_entries_with_context<I>(entries: I, ctx: C) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        C: HashContext<K>,
    {
        let entries = entries.into_iter();
        let mut map = Self::new_with_context_and_config(ctx, Config::default());
        map.reserve(entries.size_hint().0);
        for (key, value) in entries {
            map.set(key, value)?;
        }
        Ok(map)
    }

    /// Best-effort growth reservation across all four storage regions.
    pub fn reserve(&mut self, additional: usize) {
        self.leaves.reserve(additional);
        self.nodes.reserve(additional);
        self.branches.reserve(additional);
        self.children.reserve(additional);
    }

    /// Number of entries (distinct keys) in the map.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, as long as
    /// the context hashes the borrowed form identically.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: HashContext<Q>,
    {
        self.get_index(key)
            .map(|index| &self.leaves[index as usize].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: HashContext<Q>,
    {
        let index = self.get_index(key)?;
        Some(&mut self.leaves[index as usize].value)
    }

    /// Index of the key's leaf in the leaf table, stable across every
    /// subsequent read. Lets callers mutate the value in place through
    /// [`value_mut`](Hamt::value_mut).
    pub fn get_index<Q>(&self, key: &Q) -> Option<u32>
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: HashContext<Q>,
    {
        lookup(self, &self.ctx, key, self.conf.max_collisions)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized,
        K: Borrow<Q>,
        C: HashContext<Q>,
    {
        self.get_index(key).is_some()
    }

    /// Value at a leaf index previously obtained from
    /// [`get_index`](Hamt::get_index).
    pub fn value(&self, index: u32) -> Option<&V> {
        self.leaves.get(index as usize).map(|leaf| &leaf.value)
    }

    pub fn value_mut(&mut self, index: u32) -> Option<&mut V> {
        self.leaves
            .get_mut(index as usize)
            .map(|leaf| &mut leaf.value)
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// already present. The stored key is not replaced on overwrite.
    pub fn set(&mut self, key: K, value: V) -> Result<Option<V>, Error>
    where
        C: HashContext<K>,
    {
        if let Some(index) = self.get_index(&key) {
            let slot = &mut self.leaves[index as usize].value;
            return Ok(Some(std::mem::replace(slot, value)));
        }
        self.insert_new(key, value)?;
        Ok(None)
    }

    /// Looks the key up, inserting `default()` if it is absent. The returned
    /// [`GetOrPut`] says whether the key existed and hands out the value
    /// slot; writing through it is how callers initialise or update the
    /// entry in place.
    pub fn get_or_put_with<F>(&mut self, key: K, default: F) -> Result<GetOrPut<'_, V>, Error>
    where
        C: HashContext<K>,
        F: FnOnce() -> V,
    {
        let (found_existing, index) = match self.get_index(&key) {
            Some(index) => (true, index),
            None => (false, self.insert_new(key, default())?),
        };
        Ok(GetOrPut {
            found_existing,
            index,
            value: &mut self.leaves[index as usize].value,
        })
    }

    /// Places a key known to be absent, retrying across the same rehash
    /// sequence the lookup walks.
    fn insert_new(&mut self, mut key: K, mut value: V) -> Result<u32, Error>
    where
        C: HashContext<K>,
    {
        let mut prev = 0;
        for _ in 0..self.conf.max_collisions {
            let hash = self.ctx.rehash(&key, prev);
            prev = hash;
            match self.try_place(key, value, hash)? {
                Placed::At(index) => return Ok(index),
                Placed::Collision(k, v) => {
                    key = k;
                    value = v;
                }
            }
        }
        Err(Error::TooManyCollisions(self.conf.max_collisions))
    }

    /// One insertion attempt along `hash`. Walks existing branches; at the
    /// first missing child it appends the remaining path (branches until the
    /// hash is exhausted, then the leaf).
    fn try_place(&mut self, key: K, value: V, hash: u32) -> Result<Placed<K, V>, Error> {
        let mut bits = HashBits::new(hash);
        let mut at = 0u32;
        loop {
            let id = self.nodes[at as usize];
            if id.is_leaf() {
                if !bits.exhausted() {
                    return Err(Error::LeafOnPath);
                }
                return Ok(Placed::Collision(key, value));
            }
            let branch_index = id.index();
            let bit = 1u32 << bits.next();
            let branch = self.branches[branch_index as usize];
            if branch.has(bit) {
                at = self.child(&branch, branch.ordinal(bit));
                continue;
            }
            let ordinal = branch.ordinal(bit);
            if bits.exhausted() {
                self.leaves.push(Leaf { key, value });
                let leaf_index = self.leaves.len() as u32 - 1;
                let node = self.push_node(NodeId::leaf(leaf_index));
                self.link_child(branch_index, bit, ordinal, node)?;
                return Ok(Placed::At(leaf_index));
            }
            self.branches.push(Branch::EMPTY);
            let node = self.push_node(NodeId::branch(self.branches.len() as u32 - 1));
            self.link_child(branch_index, bit, ordinal, node)?;
            at = node;
        }
    }

    fn push_node(&mut self, id: NodeId) -> u32 {
        self.nodes.push(id);
        self.nodes.len() as u32 - 1
    }

    /// Splices `node` into the branch's child chain at `ordinal`, then flips
    /// the presence bit. The bit goes last so a partially grown map never
    /// exposes a dangling child.
    fn link_child(&mut self, branch_index: u32, bit: u32, ordinal: u32, node: u32) -> Result<(), Error> {
        let first = self.branches[branch_index as usize].first;
        let first = self.children.insert_at(first, ordinal, node)?;
        let branch = &mut self.branches[branch_index as usize];
        branch.first = first;
        branch.bits |= bit;
        Ok(())
    }

    /// Node-table index of the branch's child at `ordinal`.
    fn child(&self, branch: &Branch, ordinal: u32) -> u32 {
        self.children
            .nth(branch.first, ordinal)
            .expect("child chain shorter than bitmap population")
    }
}

impl<Q, K, V, C> Tables<Q> for Hamt<K, V, C>
where
    Q: ?Sized,
    K: Borrow<Q>,
{
    fn node(&self, index: u32) -> NodeId {
        self.nodes[index as usize]
    }

    fn branch(&self, index: u32) -> Branch {
        self.branches[index as usize]
    }

    fn link(&self, id: u32) -> Link<u32> {
        *self.children.get(id).expect("dangling child chain id")
    }

    fn leaf_key(&self, index: u32) -> &Q {
        self.leaves[index as usize].key.borrow()
    }
}

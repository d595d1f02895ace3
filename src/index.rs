use std::{
    borrow::Borrow,
    cmp::{Ord, Ordering},
    collections::{btree_map::Entry, BTreeMap},
    fmt, mem,
    ops::Deref,
};

use log::debug;

use crate::depth::Depth;
use crate::error::{Error, Result};

/// OrderedIndex is the seam between the catalog and its keyed storage.
///
/// Insert is first-writer-wins: inserting an existing key is a no-op and
/// returns false. Values are always enumerated in ascending key order.
/// [`Index`] is the default implementation, [`BTreeMap`] is the balanced
/// substitute.
pub trait OrderedIndex<K, V>
where
    K: Ord,
{
    /// Insert a new entry, return false if key is already present.
    fn insert(&mut self, key: K, value: V) -> bool;

    /// Get the value for key.
    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Get mutable access to the value for key.
    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized;

    /// Iterate over all values in ascending key order.
    fn values<'a>(&'a self) -> Box<dyn Iterator<Item = &'a V> + 'a>
    where
        V: 'a;

    /// Drop all entries.
    fn clear(&mut self);

    /// Return number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index manage a single instance of in-memory index using a plain,
/// unbalanced [binary search tree][bst].
///
/// No rebalancing is done, inserting keys in ascending order, which is
/// the common case for book ids, degrades the tree into a list and
/// lookups into O(n). All walks are iterative, hence a degenerate tree
/// cannot exhaust the call stack. Use [`Index::validate`] to observe the
/// tree shape.
///
/// [bst]: https://en.wikipedia.org/wiki/Binary_search_tree
pub struct Index<K, V> {
    name: String,
    root: Option<Box<Node<K, V>>>,
    n_count: usize, // number of entries in the tree.
}

/// Different ways to construct a new Index instance.
impl<K, V> Index<K, V>
where
    K: Ord,
{
    /// Create an empty instance of Index, identified by `name`.
    pub fn new<S>(name: S) -> Index<K, V>
    where
        S: AsRef<str>,
    {
        Index {
            name: name.as_ref().to_string(),
            root: Default::default(),
            n_count: Default::default(),
        }
    }

    /// Create a new instance of Index and load it with entries from
    /// `iter`, in iteration order. Duplicate keys are skipped, the first
    /// occurrence wins.
    pub fn load_from<S, I>(name: S, iter: I) -> Index<K, V>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut index = Index::new(name);
        for (key, value) in iter {
            index.insert(key, value);
        }
        index
    }
}

/// Maintenance API.
impl<K, V> Index<K, V>
where
    K: Ord,
{
    /// Identify this instance.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> = vec![];
        stack.extend(self.root.as_ref().map(|n| (n.deref(), 1)));
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left_deref().map(|n| (n, depth + 1)));
            stack.extend(node.right_deref().map(|n| (n, depth + 1)));
        }
        height
    }

    /// Return quickly with basic statisics, only entries() and
    /// node_size() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.n_count, mem::size_of::<Node<K, V>>())
    }

    /// Drop all entries, the index can be reloaded afterwards.
    pub fn clear(&mut self) {
        unlink(self.root.take());
        self.n_count = 0;
    }
}

/// Write operations on Index instance.
impl<K, V> Index<K, V>
where
    K: Ord,
{
    /// Create a new {key, value} entry in the index. If key is already
    /// present the index is left untouched and false is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match node.key.cmp(&key) {
                Ordering::Greater => &mut node.left,
                Ordering::Less => &mut node.right,
                Ordering::Equal => {
                    debug!(target: "index", "{}: ignoring duplicate key", self.name);
                    return false;
                }
            };
        }
        *slot = Some(Node::new(key, value));
        self.n_count += 1;
        true
    }

    /// Get mutable access to the value for key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref_mut();
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right.as_deref_mut(),
                Ordering::Greater => nref.left.as_deref_mut(),
                Ordering::Equal => return Some(&mut nref.value),
            };
        }
        None
    }
}

/// Read operations on Index instance.
impl<K, V> Index<K, V>
where
    K: Ord,
{
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.as_deref();
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right_deref(),
                Ordering::Greater => nref.left_deref(),
                Ordering::Equal => return Some(&nref.value),
            };
        }
        None
    }

    /// Return an iterator over all entries in ascending key order.
    /// Iteration is side-effect free and can be repeated any number
    /// of times.
    pub fn iter(&self) -> Iter<K, V> {
        let mut iter = Iter { stack: vec![] };
        iter.push_left(self.root.as_deref());
        iter
    }

    /// Return an iterator over all values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

impl<K, V> Index<K, V>
where
    K: Ord + fmt::Debug,
{
    /// Validate the tree with following rules:
    ///
    /// * Every left child sorts before its parent, every right child
    ///   sorts after its parent.
    /// * In-order walk yields keys in strictly ascending order.
    /// * Number of nodes matches the entry count.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats> {
        let mut stats = Stats::new(self.n_count, mem::size_of::<Node<K, V>>());
        let mut depths = Depth::new();

        let mut counted = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> = vec![];
        stack.extend(self.root.as_ref().map(|n| (n.deref(), 1)));
        while let Some((node, depth)) = stack.pop() {
            counted += 1;
            let (left, right) = (node.left_deref(), node.right_deref());
            if let Some(left) = left {
                if left.key.ge(&node.key) {
                    return Err(sort_error(&left.key, &node.key));
                }
                stack.push((left, depth + 1));
            }
            if let Some(right) = right {
                if right.key.le(&node.key) {
                    return Err(sort_error(&right.key, &node.key));
                }
                stack.push((right, depth + 1));
            }
            if left.is_none() && right.is_none() {
                depths.sample(depth);
            }
        }
        if counted != self.n_count {
            let expected = self.n_count;
            return Err(Error::CountMismatch { counted, expected });
        }

        let mut prev: Option<&K> = None;
        for (key, _) in self.iter() {
            match prev {
                Some(pkey) if pkey.ge(key) => return Err(sort_error(key, pkey)),
                _ => prev = Some(key),
            }
        }

        debug!(target: "index", "{}: validated, {}", self.name, depths.summary());
        stats.set_height(depths.max());
        stats.set_depths(depths);
        Ok(stats)
    }
}

fn sort_error<K: fmt::Debug>(key: &K, parent: &K) -> Error {
    Error::SortError(format!("{:?}", key), format!("{:?}", parent))
}

impl<K, V> Drop for Index<K, V> {
    fn drop(&mut self) {
        unlink(self.root.take())
    }
}

// Free nodes one by one, dropping a list-shaped tree through Box would
// recurse once per node.
fn unlink<K, V>(root: Option<Box<Node<K, V>>>) {
    let mut stack: Vec<Box<Node<K, V>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<K, V> OrderedIndex<K, V> for Index<K, V>
where
    K: Ord,
{
    fn insert(&mut self, key: K, value: V) -> bool {
        Index::insert(self, key, value)
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Index::get(self, key)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Index::get_mut(self, key)
    }

    fn values<'a>(&'a self) -> Box<dyn Iterator<Item = &'a V> + 'a>
    where
        V: 'a,
    {
        Box::new(Index::values(self))
    }

    fn clear(&mut self) {
        Index::clear(self)
    }

    fn len(&self) -> usize {
        Index::len(self)
    }
}

impl<K, V> OrderedIndex<K, V> for BTreeMap<K, V>
where
    K: Ord,
{
    fn insert(&mut self, key: K, value: V) -> bool {
        match self.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        BTreeMap::get(self, key)
    }

    fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        BTreeMap::get_mut(self, key)
    }

    fn values<'a>(&'a self) -> Box<dyn Iterator<Item = &'a V> + 'a>
    where
        V: 'a,
    {
        Box::new(BTreeMap::values(self))
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

/// In-order iterator over [`Index`], keeps the unvisited left spine on
/// an explicit stack.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(nref) = node {
            self.stack.push(nref);
            node = nref.left_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right_deref());
        Some((&node.key, &node.value))
    }
}

/// Node corresponds to a single entry in Index instance.
pub struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Box<Node<K, V>>>,  // store: left child
    right: Option<Box<Node<K, V>>>, // store: right child
}

// Primary operations on a single node.
impl<K, V> Node<K, V> {
    // CREATE operation
    fn new(key: K, value: V) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
        })
    }

    #[inline]
    fn left_deref(&self) -> Option<&Node<K, V>> {
        self.left.as_deref()
    }

    #[inline]
    fn right_deref(&self) -> Option<&Node<K, V>> {
        self.right.as_deref()
    }
}

/// Statistics on [`Index`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Index::stats`] method.
/// * To get full statisics via [`Index::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    height: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            height: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_height(&mut self, height: usize) {
        self.height = Some(height)
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Index`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Index<K,V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types. EG:
    ///
    /// ```
    /// use catalog_index::Index;
    /// let index: Index<u64, u64> = Index::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // size of value: 8 bytes
    /// // overhead is 16 bytes, two child links
    /// assert_eq!(index.stats().node_size(), 32);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of nodes on the longest root-to-leaf path, zero
    /// for an empty tree. Only computed by [`Index::validate`].
    #[inline]
    pub fn height(&self) -> Option<usize> {
        self.height
    }

    /// Return [`Depth`] statistics.
    pub fn depths(&self) -> Option<Depth> {
        match &self.depths {
            Some(depths) if depths.samples() > 0 => Some(depths.clone()),
            _ => None,
        }
    }
}

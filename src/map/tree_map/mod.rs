/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

mod cursor;
mod engine;

use self::cursor::Owner;
use self::engine::{NodeId, RedBlackTree, Side};
use super::entry::Entry;
use crate::compare::{Comparator, Natural};
use crate::Error;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::ops::Index;

pub use self::cursor::Cursor;

pub type Iter<'a, K, V, C = Natural> =
    ::std::iter::Map<IterEntry<'a, K, V, C>, fn(&'a Entry<K, V>) -> (&'a K, &'a V)>;
pub type IterKeys<'a, K, V, C = Natural> =
    ::std::iter::Map<Iter<'a, K, V, C>, fn((&'a K, &'a V)) -> &'a K>;
pub type IterValues<'a, K, V, C = Natural> =
    ::std::iter::Map<Iter<'a, K, V, C>, fn((&'a K, &'a V)) -> &'a V>;
pub type IterValuesMut<'a, K, V> =
    ::std::iter::Map<IterMut<'a, K, V>, fn((&'a K, &'a mut V)) -> &'a mut V>;

/// Creates a [`TreeMap`](crate::TreeMap) containing the given arguments:
///
/// ```
/// # use rbtree_map::*;
/// #
/// let mut m = TreeMap::new();
///
/// m.insert(1, "one");
/// m.insert(2, "two");
/// m.insert(3, "three");
///
/// assert_eq!(tree_map![1 => "one", 2 => "two", 3 => "three"], m);
/// ```
#[macro_export]
macro_rules! tree_map {
    ($($k:expr => $v:expr),* $(,)?) => {
        {
            #[allow(unused_mut)]
            let mut m = $crate::TreeMap::new();
            $(
                m.insert($k, $v);
            )*
            m
        }
    };
}

/// An ordered map with unique keys.  This implementation uses a
/// [red-black tree](https://en.wikipedia.org/wiki/Red-Black_tree).
///
/// Keys are ordered by a [`Comparator`], [`Natural`] (the key's [`Ord`]) unless another one is
/// given with [`TreeMap::with_comparator`].  Two keys are the same key if neither is less than the
/// other.
///
/// # Complexity
///
/// Let *n* be the number of elements in the map.
///
/// ## Temporal complexity
///
/// | Operation                  | Best case | Average   | Worst case  |
/// |:-------------------------- | ---------:| ---------:| -----------:|
/// | `new()`                    |      Θ(1) |      Θ(1) |        Θ(1) |
/// | `insert()`                 |      Θ(1) | Θ(log(n)) |   Θ(log(n)) |
/// | `erase()`                  |      Θ(1) | Θ(log(n)) |   Θ(log(n)) |
/// | `remove()`                 |      Θ(1) | Θ(log(n)) |   Θ(log(n)) |
/// | `get()`                    |      Θ(1) | Θ(log(n)) |   Θ(log(n)) |
/// | `contains_key()`           |      Θ(1) | Θ(log(n)) |   Θ(log(n)) |
/// | `get_at()`                 |      Θ(1) |      Θ(1) |        Θ(1) |
/// | `successor()`              |      Θ(1) | Θ(log(n)) |   Θ(log(n)) |
/// | `size()`                   |      Θ(1) |      Θ(1) |        Θ(1) |
/// | `clone()`                  |      Θ(n) |      Θ(n) |        Θ(n) |
/// | iterator creation          |      Θ(1) |      Θ(1) |        Θ(1) |
/// | iterator step              |      Θ(1) |      Θ(1) |   Θ(log(n)) |
/// | iterator full              |      Θ(n) |      Θ(n) |        Θ(n) |
///
/// # Implementation details
///
/// Insertion and removal rebalance the tree in a single pass from the root down, so neither keeps
/// a path back up.  Rotations exchange entries between nodes instead of relinking the node at the
/// top of the rotated subtree, and entries themselves never move in memory: a [`Cursor`] names an
/// entry and therefore survives any rebalancing.
#[derive(Debug)]
pub struct TreeMap<K, V, C = Natural> {
    tree: RedBlackTree<K, V, C>,
    owner: Owner,
}

impl<K, V> TreeMap<K, V>
where
    K: Ord,
{
    #[must_use]
    pub fn new() -> TreeMap<K, V> {
        TreeMap::with_comparator(Natural)
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    #[must_use]
    pub fn with_comparator(comparator: C) -> TreeMap<K, V, C> {
        TreeMap { tree: RedBlackTree::new(comparator), owner: Owner::fresh() }
    }

    #[must_use]
    #[inline]
    pub fn comparator(&self) -> &C {
        self.tree.comparator()
    }

    #[must_use]
    #[inline]
    pub fn size(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Removes every element.  Cursors into the map become stale.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|n| self.tree.entry(n)).map(|e| (&e.key, &e.value))
    }

    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|n| self.tree.entry(n)).map(|e| (&e.key, &e.value))
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        self.iter_entry().map(|e| (&e.key, &e.value))
    }

    fn iter_entry(&self) -> IterEntry<'_, K, V, C> {
        IterEntry::new(&self.tree)
    }

    #[must_use]
    pub fn keys(&self) -> IterKeys<'_, K, V, C> {
        self.iter().map(|(k, _)| k)
    }

    #[must_use]
    pub fn values(&self) -> IterValues<'_, K, V, C> {
        self.iter().map(|(_, v)| v)
    }

    /// An iterator over the entries in key order, with mutable access to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut { entries: self.tree.entries_mut().into_iter() }
    }

    pub fn values_mut(&mut self) -> IterValuesMut<'_, K, V> {
        self.iter_mut().map(|(_, v)| v)
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    /// A cursor to the element with the given key, or the end if there is none.
    #[must_use]
    pub fn find(&self, key: &K) -> Cursor {
        self.cursor(self.tree.find(key).map(|n| self.tree.entry_ref(n)))
    }

    /// The number of elements with the given key: `0` or `1`.
    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        usize::from(self.contains_key(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.find(key).is_some()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.tree.find(key).map(|n| self.tree.entry(n)).map(|e| (&e.key, &e.value))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.tree.find(key)?;

        Some(&mut self.tree.entry_mut(node).value)
    }

    /// The value for the given key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if there is no such key.
    pub fn at(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// A mutable reference to the value for the given key.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if there is no such key.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, Error> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// A mutable reference to the value for the given key, inserting `V::default()` first if the
    /// key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let entry = match self.tree.find(&key) {
            Some(node) => self.tree.entry_ref(node),
            None => self.tree.insert(key, V::default()),
        };

        &mut self.tree.live_mut(entry).value
    }

    /// Inserts `value` under `key` if the key is absent.
    ///
    /// Returns a cursor to the element with that key and whether it was inserted.  An existing
    /// element is left unchanged, and `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        match self.tree.find(&key) {
            Some(node) => (self.cursor(Some(self.tree.entry_ref(node))), false),
            None => {
                let entry = self.tree.insert(key, value);

                (self.cursor(Some(entry)), true)
            }
        }
    }

    /// Removes the element with the given key and returns its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.remove_key(key).map(|e| e.value)
    }
}

impl<K, V, C> Index<&K> for TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, C> Clone for TreeMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Clone,
{
    /// A deep copy.  The copy is a different map: cursors of `self` are not valid in it.
    fn clone(&self) -> TreeMap<K, V, C> {
        TreeMap { tree: self.tree.clone(), owner: Owner::fresh() }
    }

    fn clone_from(&mut self, source: &TreeMap<K, V, C>) {
        self.tree.clone_from(&source.tree);
        self.owner = Owner::fresh();
    }
}

impl<K, V, C> Default for TreeMap<K, V, C>
where
    C: Default,
{
    fn default() -> TreeMap<K, V, C> {
        TreeMap::with_comparator(C::default())
    }
}

impl<K, V: PartialEq, C> PartialEq for TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn eq(&self, other: &TreeMap<K, V, C>) -> bool {
        self.size() == other.size()
            && self.iter().all(|(key, value)| other.get(key).is_some_and(|v| *value == *v))
    }
}

impl<K, V: Eq, C> Eq for TreeMap<K, V, C> where C: Comparator<K> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn partial_cmp(&self, other: &TreeMap<K, V, C>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn cmp(&self, other: &TreeMap<K, V, C>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: Hash, V: Hash, C> Hash for TreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Add the hash of length so that if two collections are added one after the other it
        // doesn't hash to the same thing as a single collection with the same elements in the same
        // order.
        self.size().hash(state);

        for e in self {
            e.hash(state);
        }
    }
}

impl<K, V, C> Display for TreeMap<K, V, C>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        let mut first = true;

        fmt.write_str("{")?;

        for (k, v) in self.iter() {
            if !first {
                fmt.write_str(", ")?;
            }
            k.fmt(fmt)?;
            fmt.write_str(": ")?;
            v.fmt(fmt)?;
            first = false;
        }

        fmt.write_str("}")
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Iter<'a, K, V, C> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut TreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter { entries: self.tree.into_entries().into_iter() }
    }
}

/// Keeps the first value given for each key, the same as repeated [`TreeMap::insert`] calls.
impl<K, V, C> FromIterator<(K, V)> for TreeMap<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(into_iter: I) -> TreeMap<K, V, C> {
        let mut map = TreeMap::default();

        map.extend(into_iter);

        map
    }
}

impl<K, V, C> Extend<(K, V)> for TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, into_iter: I) {
        for (k, v) in into_iter {
            self.insert(k, v);
        }
    }
}

#[derive(Debug)]
pub struct IterEntry<'a, K: 'a, V: 'a, C: 'a> {
    tree: &'a RedBlackTree<K, V, C>,

    stack_forward:  Option<Stack>,
    stack_backward: Option<Stack>,

    left_index:  usize, // inclusive
    right_index: usize, // exclusive
}

// This is a stack for navigating through the tree. It can be used to go either forwards or
// backwards, but not both: when you call `dig` or `advance`, you must use the same value of
// `backwards` for the entire lifetime of this stack.
#[derive(Debug)]
struct Stack {
    // The current node is at the top of the stack. If we are moving forwards, the rest of the
    // stack consists of those ancestors of the current node that contain the current node in
    // their left subtree. In other words, the keys in the stack increase as we go from the top of
    // the stack to the bottom.
    stack: Vec<NodeId>,
}

impl Stack {
    fn new(size: usize) -> Stack {
        Stack { stack: Vec::with_capacity(iter_utils::conservative_height(size) + 1) }
    }

    #[inline]
    fn current(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    #[inline]
    fn towards(backwards: bool) -> Side {
        if backwards {
            Side::Right
        } else {
            Side::Left
        }
    }

    fn dig<K, V, C>(&mut self, tree: &RedBlackTree<K, V, C>, backwards: bool) {
        let side = Stack::towards(backwards);
        let mut child = self.current().and_then(|node| tree.child(node, side));

        while let Some(c) = child {
            self.stack.push(c);
            child = tree.child(c, side);
        }
    }

    fn advance<K, V, C>(&mut self, tree: &RedBlackTree<K, V, C>, backwards: bool) {
        if let Some(node) = self.stack.pop() {
            let side = Stack::towards(backwards).opposite();

            if let Some(c) = tree.child(node, side) {
                self.stack.push(c);
                self.dig(tree, backwards);
            }
        }
    }
}

mod iter_utils {
    use std::mem::size_of;

    pub fn lg_floor(size: usize) -> usize {
        debug_assert!(size > 0);

        let c: usize = 8 * size_of::<usize>() - size.leading_zeros() as usize;

        c - 1
    }

    pub fn conservative_height(size: usize) -> usize {
        if size > 0 {
            2 * lg_floor(size + 1)
        } else {
            0
        }
    }
}

impl<'a, K, V, C> IterEntry<'a, K, V, C> {
    fn new(tree: &'a RedBlackTree<K, V, C>) -> IterEntry<'a, K, V, C> {
        IterEntry {
            tree,

            stack_forward: None,
            stack_backward: None,

            left_index: 0,
            right_index: tree.size(),
        }
    }

    fn init_if_needed(&mut self, backwards: bool) {
        let stack_field = if backwards {
            &mut self.stack_backward
        } else {
            &mut self.stack_forward
        };

        if stack_field.is_none() {
            let mut stack = Stack::new(self.tree.size());

            if let Some(r) = self.tree.root() {
                stack.stack.push(r);
                stack.dig(self.tree, backwards);
            }

            *stack_field = Some(stack);
        }
    }

    #[inline]
    fn non_empty(&self) -> bool {
        self.left_index < self.right_index
    }

    fn step(&mut self, backwards: bool) -> Option<&'a Entry<K, V>> {
        self.init_if_needed(backwards);

        if !self.non_empty() {
            return None;
        }

        let tree = self.tree;
        let stack = if backwards {
            self.stack_backward.as_mut()
        } else {
            self.stack_forward.as_mut()
        }?;
        let current = stack.current().map(|node| tree.entry(node));

        stack.advance(tree, backwards);

        if backwards {
            self.right_index -= 1;
        } else {
            self.left_index += 1;
        }

        current
    }
}

impl<'a, K, V, C> Iterator for IterEntry<'a, K, V, C> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<&'a Entry<K, V>> {
        self.step(false)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.right_index - self.left_index;

        (len, Some(len))
    }
}

impl<'a, K, V, C> DoubleEndedIterator for IterEntry<'a, K, V, C> {
    fn next_back(&mut self) -> Option<&'a Entry<K, V>> {
        self.step(true)
    }
}

impl<'a, K, V, C> ExactSizeIterator for IterEntry<'a, K, V, C> {}

/// An in-order iterator over the entries of a [`TreeMap`] with mutable access to the values.
#[derive(Debug)]
pub struct IterMut<'a, K, V> {
    entries: ::std::vec::IntoIter<&'a mut Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.entries.next().map(|e| (&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> {
        self.entries.next_back().map(|e| (&e.key, &mut e.value))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

/// An owning in-order iterator over the entries of a [`TreeMap`].
#[derive(Debug)]
pub struct IntoIter<K, V> {
    entries: ::std::vec::IntoIter<Entry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.entries.next().map(|e| (e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.entries.next_back().map(|e| (e.key, e.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

#[cfg(feature = "serde")]
pub mod serde {
    use super::*;
    use ::serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use ::serde::ser::{Serialize, Serializer};
    use std::fmt;
    use std::marker::PhantomData;

    impl<K, V, C> Serialize for TreeMap<K, V, C>
    where
        K: Serialize,
        V: Serialize,
    {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self)
        }
    }

    impl<'de, K, V, C> Deserialize<'de> for TreeMap<K, V, C>
    where
        K: Deserialize<'de>,
        V: Deserialize<'de>,
        C: Comparator<K> + Default,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<TreeMap<K, V, C>, D::Error> {
            deserializer.deserialize_map(TreeMapVisitor { phantom: PhantomData })
        }
    }

    struct TreeMapVisitor<K, V, C> {
        phantom: PhantomData<(K, V, C)>,
    }

    impl<'de, K, V, C> Visitor<'de> for TreeMapVisitor<K, V, C>
    where
        K: Deserialize<'de>,
        V: Deserialize<'de>,
        C: Comparator<K> + Default,
    {
        type Value = TreeMap<K, V, C>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map")
        }

        fn visit_map<A>(self, mut map: A) -> Result<TreeMap<K, V, C>, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut tree_map = TreeMap::default();

            while let Some((k, v)) = map.next_entry()? {
                tree_map.insert(k, v);
            }

            Ok(tree_map)
        }
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::engine::{EntryRef, NodeId};
use super::TreeMap;
use crate::compare::Comparator;
use crate::Error;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Identifies one map instance.  Every map, including every clone, gets its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Owner(u64);

impl Owner {
    pub(crate) fn fresh() -> Owner {
        Owner(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A position in a [`TreeMap`]: either one of its elements or the position past the last one.
///
/// A cursor is a plain copyable handle.  It borrows nothing, so the map can be modified while
/// cursors to it exist.  A cursor keeps denoting its element across insertions and removals of
/// *other* elements; once its own element is removed the cursor is stale and every operation on
/// it reports [`Error::InvalidCursor`].
///
/// Two cursors are equal if they come from the same map and denote the same element, or are both
/// the end of the same map.
///
/// ```
/// # use rbtree_map::TreeMap;
/// #
/// let mut map = TreeMap::new();
///
/// map.insert(1, "one");
/// map.insert(2, "two");
///
/// let mut cursor = map.begin();
/// let mut keys = Vec::new();
///
/// while cursor != map.end() {
///     keys.push(*map.get_at(cursor)?.0);
///     cursor = map.successor(cursor)?;
/// }
///
/// assert_eq!(keys, vec![1, 2]);
/// # Ok::<(), rbtree_map::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    owner: Owner,
    entry: Option<EntryRef>,
}

impl Cursor {
    #[must_use]
    #[inline]
    pub fn is_end(&self) -> bool {
        self.entry.is_none()
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    pub(super) fn cursor(&self, entry: Option<EntryRef>) -> Cursor {
        Cursor { owner: self.owner, entry }
    }

    fn cursor_at(&self, node: Option<NodeId>) -> Cursor {
        self.cursor(node.map(|n| self.tree.entry_ref(n)))
    }

    /// The entry a cursor denotes, provided it belongs to this map.  `Ok(None)` is the end.
    fn entry_of(&self, cursor: Cursor) -> Result<Option<EntryRef>, Error> {
        if cursor.owner == self.owner {
            Ok(cursor.entry)
        } else {
            Err(Error::InvalidCursor)
        }
    }

    /// A cursor to the first element, or the end if the map is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor {
        self.cursor_at(self.tree.first())
    }

    #[must_use]
    pub fn end(&self) -> Cursor {
        self.cursor(None)
    }

    /// Returns `true` if the cursor belongs to this map and is either its end or denotes an
    /// element still in the map.
    #[must_use]
    pub fn is_valid(&self, cursor: Cursor) -> bool {
        match self.entry_of(cursor) {
            Ok(None) => true,
            Ok(Some(entry)) => self.tree.resolve(entry).is_some(),
            Err(_) => false,
        }
    }

    /// The key and value the cursor denotes.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] if the cursor is the end, comes from another map, or denotes an
    /// element that was removed.
    pub fn get_at(&self, cursor: Cursor) -> Result<(&K, &V), Error> {
        let entry = self.entry_of(cursor)?.ok_or(Error::InvalidCursor)?;

        self.tree
            .resolve(entry)
            .map(|e| (&e.key, &e.value))
            .ok_or(Error::InvalidCursor)
    }

    /// The key and a mutable reference to the value the cursor denotes.
    ///
    /// # Errors
    ///
    /// Same as [`TreeMap::get_at`].
    pub fn get_at_mut(&mut self, cursor: Cursor) -> Result<(&K, &mut V), Error> {
        let entry = self.entry_of(cursor)?.ok_or(Error::InvalidCursor)?;

        self.tree
            .resolve_mut(entry)
            .map(|e| (&e.key, &mut e.value))
            .ok_or(Error::InvalidCursor)
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: Comparator<K>,
{
    /// The node a cursor denotes.  `Ok(None)` is the end.
    fn locate(&self, cursor: Cursor) -> Result<Option<NodeId>, Error> {
        match self.entry_of(cursor)? {
            None => Ok(None),
            Some(entry) => self.tree.node_of(entry).map(Some).ok_or(Error::InvalidCursor),
        }
    }

    /// A cursor to the element after the one `cursor` denotes.  The successor of the last element
    /// is the end.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] if `cursor` is the end, comes from another map, or is stale.
    pub fn successor(&self, cursor: Cursor) -> Result<Cursor, Error> {
        let node = self.locate(cursor)?.ok_or(Error::InvalidCursor)?;

        Ok(self.cursor_at(self.tree.successor(node)))
    }

    /// A cursor to the element before the one `cursor` denotes.  The precursor of the end is the
    /// last element.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] if `cursor` is the beginning (including the end of an empty map),
    /// comes from another map, or is stale.
    pub fn precursor(&self, cursor: Cursor) -> Result<Cursor, Error> {
        let node = self.locate(cursor)?;

        self.tree
            .precursor(node)
            .map(|n| self.cursor_at(Some(n)))
            .ok_or(Error::InvalidCursor)
    }

    /// Removes the element the cursor denotes and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCursor`] if the cursor is the end, comes from another map, or denotes an
    /// element that was already removed.  The map is left untouched.
    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V), Error> {
        let entry = self.entry_of(cursor)?.ok_or(Error::InvalidCursor)?;

        self.tree
            .remove(entry)
            .map(|e| (e.key, e.value))
            .ok_or(Error::InvalidCursor)
    }
}

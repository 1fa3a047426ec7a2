/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The red-black tree behind [`TreeMap`](super::TreeMap).
//!
//! Nodes and entries live in two separate arenas.  A node refers to its entry by slot, and a
//! rotation never relinks the node at the top of the rotated subtree: it exchanges entry slots
//! between the nodes involved and relinks the children below them.  Entries themselves never
//! move, which is what keeps a [`EntryRef`] meaningful across rebalancing.
//!
//! Nodes have no parent links.  Whenever an ancestor is needed it is recovered by descending from
//! the root again.

use super::super::entry::Entry;
use crate::compare::Comparator;
use slab::Slab;
use std::mem;

pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A reference to an entry that stays valid until that entry is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryRef {
    slot: usize,
    stamp: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Node {
    entry: usize,
    color: Color,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node {
    fn new(entry: usize, color: Color) -> Node {
        Node { entry, color, left: None, right: None }
    }

    #[inline]
    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RedBlackTree<K, V, C> {
    nodes: Slab<Node>,
    entries: Slab<Entry<K, V>>,
    root: Option<NodeId>,
    size: usize,
    next_stamp: u64,
    comparator: C,
}

impl<K, V, C> RedBlackTree<K, V, C> {
    pub fn new(comparator: C) -> RedBlackTree<K, V, C> {
        RedBlackTree {
            nodes: Slab::new(),
            entries: Slab::new(),
            root: None,
            size: 0,
            next_stamp: 0,
            comparator,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[inline]
    pub fn child(&self, node: NodeId, side: Side) -> Option<NodeId> {
        self.nodes[node].child(side)
    }

    #[inline]
    pub fn entry(&self, node: NodeId) -> &Entry<K, V> {
        &self.entries[self.nodes[node].entry]
    }

    #[inline]
    pub fn entry_mut(&mut self, node: NodeId) -> &mut Entry<K, V> {
        &mut self.entries[self.nodes[node].entry]
    }

    pub fn entry_ref(&self, node: NodeId) -> EntryRef {
        let slot = self.nodes[node].entry;

        EntryRef { slot, stamp: self.entries[slot].stamp }
    }

    /// Returns the entry, or `None` if it has been removed.
    pub fn resolve(&self, entry: EntryRef) -> Option<&Entry<K, V>> {
        self.entries.get(entry.slot).filter(|e| e.stamp == entry.stamp)
    }

    pub fn resolve_mut(&mut self, entry: EntryRef) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(entry.slot).filter(|e| e.stamp == entry.stamp)
    }

    /// The entry behind a handle that was just handed out by [`RedBlackTree::insert`] or
    /// [`RedBlackTree::entry_ref`].  Panics if the entry has been removed since.
    pub fn live_mut(&mut self, entry: EntryRef) -> &mut Entry<K, V> {
        let live = &mut self.entries[entry.slot];

        debug_assert_eq!(live.stamp, entry.stamp);

        live
    }

    pub fn minimum(&self, node: NodeId) -> NodeId {
        self.extreme(node, Side::Left)
    }

    pub fn maximum(&self, node: NodeId) -> NodeId {
        self.extreme(node, Side::Right)
    }

    fn extreme(&self, mut node: NodeId, side: Side) -> NodeId {
        while let Some(next) = self.child(node, side) {
            node = next;
        }

        node
    }

    pub fn first(&self) -> Option<NodeId> {
        self.root.map(|root| self.minimum(root))
    }

    pub fn last(&self) -> Option<NodeId> {
        self.root.map(|root| self.maximum(root))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entries.clear();
        self.root = None;
        self.size = 0;
    }

    /// Entry slots in key order.
    fn ordered_slots(&self) -> Vec<usize> {
        let mut slots = Vec::with_capacity(self.size);
        let mut stack: Vec<NodeId> = Vec::new();
        let mut current = self.root;

        loop {
            while let Some(node) = current {
                stack.push(node);
                current = self.child(node, Side::Left);
            }

            match stack.pop() {
                Some(node) => {
                    slots.push(self.nodes[node].entry);
                    current = self.child(node, Side::Right);
                }
                None => break slots,
            }
        }
    }

    /// Mutable references to every entry, in key order.
    pub fn entries_mut(&mut self) -> Vec<&mut Entry<K, V>> {
        let order = self.ordered_slots();
        let mut by_slot: Vec<Option<&mut Entry<K, V>>> = Vec::new();

        for (slot, entry) in &mut self.entries {
            if by_slot.len() <= slot {
                by_slot.resize_with(slot + 1, || None);
            }
            by_slot[slot] = Some(entry);
        }

        order.into_iter().filter_map(|slot| by_slot[slot].take()).collect()
    }

    /// Consumes the tree and returns its entries in key order.
    pub fn into_entries(self) -> Vec<Entry<K, V>> {
        let order = self.ordered_slots();
        let mut entries = self.entries;

        order.into_iter().map(|slot| entries.remove(slot)).collect()
    }

    #[inline]
    fn is_red(&self, node: Option<NodeId>) -> bool {
        node.is_some_and(|n| self.nodes[n].color == Color::Red)
    }

    fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if let Some((a, b)) = self.nodes.get2_mut(a, b) {
            mem::swap(&mut a.entry, &mut b.entry);
        }
    }

    /// Rotates the subtree under `top` towards `side` and returns the node that went down.
    ///
    /// The child of `top` on the opposite side rises.  It hands its entry over to `top`, which
    /// stays where it is, and takes the entry of `top` one level down.  Drawn for
    /// `side == Side::Right`, with the entries inside the boxes:
    ///
    /// ```text
    ///              ┏━━━┓                           ┏━━━┓
    ///          top ┃ t ┃                       top ┃ r ┃
    ///              ┗━━━┛                           ┗━━━┛
    ///               ╱ ╲                             ╱ ╲
    ///          ┌───┐   x          ────▶            a  ┌───┐
    ///    risen │ r │                                  │ t │ risen
    ///          └───┘                                  └───┘
    ///           ╱ ╲                                    ╱ ╲
    ///          a   b                                  b   x
    /// ```
    ///
    /// `top` ends up black and the lowered node red; every other node keeps its color.
    fn rotate(&mut self, top: NodeId, side: Side) -> NodeId {
        let risen = self
            .child(top, side.opposite())
            .expect("rotation needs a child on the rising side");
        let outer = self.child(risen, side.opposite());
        let inner = self.child(risen, side);
        let far = self.child(top, side);

        self.swap_entries(top, risen);

        let top_node = &mut self.nodes[top];
        top_node.set_child(side.opposite(), outer);
        top_node.set_child(side, Some(risen));
        top_node.color = Color::Black;

        let lowered = &mut self.nodes[risen];
        lowered.set_child(side.opposite(), inner);
        lowered.set_child(side, far);
        lowered.color = Color::Red;

        risen
    }

    /// Two rotations: first the child on the opposite side of `side` is rotated away from it, then
    /// `top` is rotated towards `side`.  Returns the node that went down in the second rotation.
    fn rotate_double(&mut self, top: NodeId, side: Side) -> NodeId {
        let near = self
            .child(top, side.opposite())
            .expect("double rotation needs a child on the rising side");

        self.rotate(near, side.opposite());
        self.rotate(top, side)
    }
}

impl<K, V, C> RedBlackTree<K, V, C>
where
    C: Comparator<K>,
{
    #[inline]
    fn key(&self, node: NodeId) -> &K {
        &self.entry(node).key
    }

    /// The side of `node` that a search for `key` continues on.  Equivalent keys go right.
    #[inline]
    fn side_towards(&self, key: &K, node: NodeId) -> Side {
        if self.comparator.less(key, self.key(node)) {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn find(&self, key: &K) -> Option<NodeId> {
        let mut current = self.root;

        while let Some(node) = current {
            let node_key = self.key(node);

            if self.comparator.less(key, node_key) {
                current = self.child(node, Side::Left);
            } else if self.comparator.less(node_key, key) {
                current = self.child(node, Side::Right);
            } else {
                return Some(node);
            }
        }

        None
    }

    /// The node currently holding `entry`.
    pub fn node_of(&self, entry: EntryRef) -> Option<NodeId> {
        let key = &self.resolve(entry)?.key;

        self.find(key).filter(|&node| self.nodes[node].entry == entry.slot)
    }

    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        match self.child(node, Side::Right) {
            Some(right) => Some(self.minimum(right)),
            None => self.last_turn(node, Side::Left),
        }
    }

    /// The predecessor of `node`.  The predecessor of the position past the end (`None`) is the
    /// maximum of the tree.
    pub fn precursor(&self, node: Option<NodeId>) -> Option<NodeId> {
        let Some(node) = node else {
            return self.last();
        };

        match self.child(node, Side::Left) {
            Some(left) => Some(self.maximum(left)),
            None => self.last_turn(node, Side::Right),
        }
    }

    /// Descends from the root to `node` and returns the last ancestor that the path left through
    /// its `side` child.
    fn last_turn(&self, node: NodeId, side: Side) -> Option<NodeId> {
        let key = self.key(node);
        let mut current = self.root;
        let mut turn = None;

        while let Some(ancestor) = current {
            if ancestor == node {
                return turn;
            }

            let next = self.side_towards(key, ancestor);

            if next == side {
                turn = Some(ancestor);
            }

            current = self.child(ancestor, next);
        }

        None
    }

    /// Inserts a new entry in a single pass from the root down.
    ///
    /// The key must not be present already: uniqueness is up to the caller.
    pub fn insert(&mut self, key: K, value: V) -> EntryRef {
        let stamp = self.next_stamp;

        self.next_stamp += 1;
        self.size += 1;

        let Some(root) = self.root else {
            let slot = self.entries.insert(Entry::new(key, value, stamp));

            self.root = Some(self.nodes.insert(Node::new(slot, Color::Black)));

            return EntryRef { slot, stamp };
        };

        let mut grandparent: Option<NodeId> = None;
        let mut parent: Option<NodeId> = None;
        let mut current = root;
        // Directions from grandparent to parent and from parent to current.
        let mut last = Side::Left;
        let mut dir = Side::Left;

        let inserted = loop {
            if self.is_red(self.child(current, Side::Left))
                && self.is_red(self.child(current, Side::Right))
            {
                self.flip_colors(current);

                if current == root {
                    self.nodes[root].color = Color::Black;
                }

                (parent, current, dir) =
                    self.resolve_red_red(grandparent, parent, current, last, dir);
            }

            let next_dir = self.side_towards(&key, current);

            match self.child(current, next_dir) {
                Some(next) => {
                    grandparent = parent;
                    parent = Some(current);
                    current = next;
                    last = dir;
                    dir = next_dir;
                }
                None => {
                    let slot = self.entries.insert(Entry::new(key, value, stamp));
                    let leaf = self.nodes.insert(Node::new(slot, Color::Red));

                    self.nodes[current].set_child(next_dir, Some(leaf));
                    self.resolve_red_red(parent, Some(current), leaf, dir, next_dir);

                    break EntryRef { slot, stamp };
                }
            }
        };

        self.nodes[root].color = Color::Black;

        inserted
    }

    fn flip_colors(&mut self, node: NodeId) {
        self.nodes[node].color = Color::Red;

        for side in [Side::Left, Side::Right] {
            if let Some(child) = self.child(node, side) {
                self.nodes[child].color = Color::Black;
            }
        }
    }

    /// Repairs a red `current` under a red `parent` by rotating at `grandparent`.  `last` is the
    /// side of `parent` under `grandparent` and `dir` the side of `current` under `parent`.
    ///
    /// Returns the parent, node and side from which the descent continues.  After a double
    /// rotation the entry of `current` sits at the top of the subtree, so the descent resumes
    /// there.
    fn resolve_red_red(
        &mut self,
        grandparent: Option<NodeId>,
        parent: Option<NodeId>,
        current: NodeId,
        last: Side,
        dir: Side,
    ) -> (Option<NodeId>, NodeId, Side) {
        if !self.is_red(parent) || !self.is_red(Some(current)) {
            return (parent, current, dir);
        }

        // A red parent is never the root, so it always has a parent of its own.
        let Some(grandparent) = grandparent else {
            return (parent, current, dir);
        };

        if dir == last {
            // Left-left or right-right.
            self.rotate(grandparent, last.opposite());

            (Some(grandparent), current, last)
        } else {
            // Left-right or right-left.
            self.rotate_double(grandparent, last.opposite());

            (None, grandparent, dir)
        }
    }

    pub fn remove_key(&mut self, key: &K) -> Option<Entry<K, V>> {
        let node = self.find(key)?;
        let entry = self.entry_ref(node);

        self.remove(entry)
    }

    /// Removes an entry in a single pass from the root down, making sure that the node the
    /// descent steps into is red (or has a red child on the way) before it gets there.
    ///
    /// The descent leaves the target towards its right subtree, so it bottoms out at the
    /// target's in-order successor whenever the target has a right child.  That last node has at
    /// most one child: it takes over the target's entry and is unlinked.
    ///
    /// Returns `None`, leaving the tree valid, if the entry is no longer in the tree.
    pub fn remove(&mut self, target: EntryRef) -> Option<Entry<K, V>> {
        self.resolve(target)?;

        let root = self.root?;

        let mut parent: Option<NodeId> = None;
        let mut current = root;
        // Side of `current` under `parent`.
        let mut last = Side::Right;
        let mut found: Option<NodeId> = None;

        let dir = loop {
            let dir = if self.nodes[current].entry == target.slot {
                found = Some(current);
                Side::Right
            } else {
                self.side_towards(&self.entries[target.slot].key, current)
            };

            if !self.is_red(Some(current)) && !self.is_red(self.child(current, dir)) {
                if self.is_red(self.child(current, dir.opposite())) {
                    // The red child on the other side rises; our entry moves into a red node.
                    let lowered = self.rotate(current, dir);

                    if found == Some(current) {
                        found = Some(lowered);
                    }

                    parent = Some(current);
                    current = lowered;
                } else if let Some(above) = parent {
                    if let Some(sibling) = self.child(above, last.opposite()) {
                        let sibling_inner = self.child(sibling, last);
                        let sibling_outer = self.child(sibling, last.opposite());

                        if !self.is_red(sibling_inner) && !self.is_red(sibling_outer) {
                            self.nodes[above].color = Color::Black;
                            self.nodes[sibling].color = Color::Red;
                            self.nodes[current].color = Color::Red;
                        } else {
                            let lowered = if self.is_red(sibling_inner) {
                                self.rotate_double(above, last)
                            } else {
                                self.rotate(above, last)
                            };

                            if found == Some(above) {
                                found = Some(lowered);
                            }

                            self.nodes[current].color = Color::Red;
                            self.nodes[above].color = Color::Red;

                            for side in [Side::Left, Side::Right] {
                                if let Some(child) = self.child(above, side) {
                                    self.nodes[child].color = Color::Black;
                                }
                            }

                            parent = Some(lowered);
                        }
                    }
                }
            }

            match self.child(current, dir) {
                Some(next) => {
                    parent = Some(current);
                    current = next;
                    last = dir;
                }
                None => break dir,
            }
        };

        let removed = found.map(|found| {
            if found != current {
                self.swap_entries(found, current);
            }

            let orphan = self.child(current, dir.opposite());

            match parent {
                Some(above) => {
                    let side = if self.child(above, Side::Left) == Some(current) {
                        Side::Left
                    } else {
                        Side::Right
                    };

                    self.nodes[above].set_child(side, orphan);
                }
                None => self.root = orphan,
            }

            self.nodes.remove(current);
            self.size -= 1;

            self.entries.remove(target.slot)
        });

        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }

        removed
    }
}

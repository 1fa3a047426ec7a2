/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Orderings over keys.
//!
//! A [`TreeMap`](crate::TreeMap) is ordered by a [`Comparator`], a strict weak order given by a
//! single `less` predicate.  Two keys are *equivalent*, and therefore name the same entry, when
//! neither is less than the other.  Keys never need an equality operation.

use std::cmp::Ordering;

/// A strict weak order over `K`.
///
/// Implementations must be irreflexive (`less(a, a)` is false) and transitive, and equivalence
/// (see [`Comparator::equivalent`]) must be transitive as well.  The map relies on this but cannot
/// check it; an inconsistent comparator leaves the map in an unspecified, yet memory safe, state.
///
/// Any closure `Fn(&K, &K) -> bool` is a comparator:
///
/// ```
/// # use rbtree_map::TreeMap;
/// #
/// let mut map = TreeMap::with_comparator(|a: &i32, b: &i32| a > b);
///
/// map.insert(1, "one");
/// map.insert(2, "two");
///
/// assert_eq!(map.first(), Some((&2, &"two")));
/// ```
pub trait Comparator<K: ?Sized> {
    /// Returns `true` if `lhs` is ordered strictly before `rhs`.
    fn less(&self, lhs: &K, rhs: &K) -> bool;

    fn equivalent(&self, lhs: &K, rhs: &K) -> bool {
        !self.less(lhs, rhs) && !self.less(rhs, lhs)
    }

    fn ordering(&self, lhs: &K, rhs: &K) -> Ordering {
        if self.less(lhs, rhs) {
            Ordering::Less
        } else if self.less(rhs, lhs) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The ordering given by the key's [`Ord`] implementation.  This is the default comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K> Comparator<K> for Natural
where
    K: Ord + ?Sized,
{
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        lhs < rhs
    }
}

/// The reverse of another comparator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C = Natural>(pub C);

impl<K, C> Comparator<K> for Reverse<C>
where
    K: ?Sized,
    C: Comparator<K>,
{
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        self.0.less(rhs, lhs)
    }
}

impl<K, F> Comparator<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        self(lhs, rhs)
    }
}

#[cfg(test)]
mod test;

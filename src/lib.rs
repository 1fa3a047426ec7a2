/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

#![cfg_attr(feature = "fatal-warnings", deny(warnings))]

// Note: Keep this in sync with `README.md`.  Note that the doc links must be removed.
//! # rbtree-map
//!
//! An ordered map with unique keys, backed by a red-black tree.
//!
//! [`TreeMap`](map/tree_map/struct.TreeMap.html) keeps its keys sorted under a
//! [`Comparator`](compare/trait.Comparator.html) and offers logarithmic lookup, insertion and
//! removal.  Besides the usual associative operations and borrowing iterators it hands out
//! [`Cursor`](map/tree_map/struct.Cursor.html)s: copyable positions that can be moved forwards
//! and backwards, read through, and erased, and that keep pointing at their element while other
//! elements come and go.
//!
//! ## Example
//!
//! ```rust
//! use rbtree_map::{Error, TreeMap};
//!
//! let mut map = TreeMap::new();
//!
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(key, key * 10);
//! }
//!
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 7, 8, 9]);
//!
//! let (cursor, inserted) = map.insert(5, 0);
//!
//! assert!(!inserted);
//! assert_eq!(map.get_at(cursor), Ok((&5, &50)));
//!
//! map.erase(cursor)?;
//!
//! assert_eq!(map.count(&5), 0);
//! assert_eq!(map.at(&5), Err(Error::KeyNotFound));
//! assert_eq!(map.erase(cursor), Err(Error::InvalidCursor));
//!
//! *map.get_or_insert_default(42) += 1;
//!
//! assert_eq!(map[&42], 1);
//! # Ok::<(), Error>(())
//! ```
//!
//! ## Custom orderings
//!
//! Any [`Comparator`](compare/trait.Comparator.html) can order the map, including closures:
//!
//! ```rust
//! use rbtree_map::{Natural, Reverse, TreeMap};
//!
//! let mut map = TreeMap::with_comparator(Reverse(Natural));
//!
//! map.insert("a", 1);
//! map.insert("b", 2);
//!
//! assert_eq!(map.first(), Some((&"b", &2)));
//! ```

pub mod compare;
mod error;
pub mod map;

pub use compare::{Comparator, Natural, Reverse};
pub use error::Error;
pub use map::tree_map::{Cursor, TreeMap};

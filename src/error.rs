/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

/// Errors reported by the bounds-checked operations of a [`TreeMap`](crate::TreeMap).
///
/// A failed operation never modifies the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// No entry is stored under the requested key.
    #[error("key not found")]
    KeyNotFound,

    /// The cursor is the end cursor where an element is required, was produced by another map,
    /// or denotes an element that has since been removed.
    #[error("invalid cursor")]
    InvalidCursor,
}

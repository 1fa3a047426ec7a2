/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_natural() {
    assert!(Natural.less(&1, &2));
    assert!(!Natural.less(&2, &1));
    assert!(!Natural.less(&2, &2));
    assert!(Natural.less("abc", "abd"));
}

#[test]
fn test_reverse() {
    let reverse = Reverse(Natural);

    assert!(reverse.less(&2, &1));
    assert!(!reverse.less(&1, &2));
    assert!(!reverse.less(&1, &1));
    assert_eq!(reverse.ordering(&1, &2), Ordering::Greater);
}

#[test]
fn test_closure() {
    let by_length = |a: &&str, b: &&str| a.len() < b.len();

    assert!(by_length.less(&"ab", &"abc"));
    assert!(by_length.equivalent(&"ab", &"cd"));
    assert!(!by_length.equivalent(&"ab", &"c"));
}

#[test]
fn test_equivalent() {
    assert!(Natural.equivalent(&3, &3));
    assert!(!Natural.equivalent(&3, &4));

    // Case-insensitive keys are equivalent without being equal.
    let ignore_case = |a: &String, b: &String| a.to_lowercase() < b.to_lowercase();

    assert!(ignore_case.equivalent(&"Key".to_owned(), &"kEY".to_owned()));
}

#[test]
fn test_ordering() {
    assert_eq!(Natural.ordering(&1, &2), Ordering::Less);
    assert_eq!(Natural.ordering(&2, &2), Ordering::Equal);
    assert_eq!(Natural.ordering(&3, &2), Ordering::Greater);
}

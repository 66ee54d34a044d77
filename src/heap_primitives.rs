// Heap index arithmetic implemented externally.
//
// The candidate heap lives in the tail of the candidate array, mirrored: heap
// position 0 (the root) sits at the *last* array index and position p at
// `len - 1 - p`. Mirroring lets a popped root slide into the slot adjacent to
// the sorted prefix without shifting anything.
//
// Positions follow the usual binary layout:
//
//                           0
//              1                         2
//       3            4            5             6
//   7      8      9     10    11     12     13     14
//
// with
//   - parent: (p-1)/2
//   - left child: 2p + 1
//   - right child: 2p + 2

/// The parent position.
///
/// ```
/// use submax::heap_primitives::heap_parent;
/// assert_eq!(heap_parent(1), 0);
/// assert_eq!(heap_parent(2), 0);
/// assert_eq!(heap_parent(3), 1);
/// assert_eq!(heap_parent(4), 1);
/// assert_eq!(heap_parent(5), 2);
/// assert_eq!(heap_parent(6), 2);
/// assert_eq!(heap_parent(25), 12);
/// ```
#[inline(always)]
#[must_use]
pub fn heap_parent(p: usize) -> usize {
    (p - 1) >> 1
}

/// The left child position.
///
/// ```
/// use submax::heap_primitives::heap_child_left;
/// assert_eq!(heap_child_left(0), 1);
/// assert_eq!(heap_child_left(1), 3);
/// assert_eq!(heap_child_left(3), 7);
/// assert_eq!(heap_child_left(11), 23);
/// ```
#[inline(always)]
#[must_use]
pub fn heap_child_left(p: usize) -> usize {
    (2 * p) + 1
}

/// The right child position.
///
/// ```
/// use submax::heap_primitives::heap_child_right;
/// assert_eq!(heap_child_right(0), 2);
/// assert_eq!(heap_child_right(1), 4);
/// assert_eq!(heap_child_right(2), 6);
/// assert_eq!(heap_child_right(6), 14);
/// ```
#[inline(always)]
#[must_use]
pub fn heap_child_right(p: usize) -> usize {
    2 * (p + 1)
}

/// The array index backing heap position `p` in an array of length `len`.
///
/// The root maps to the last index.
///
/// ```
/// use submax::heap_primitives::mirrored_index;
/// assert_eq!(mirrored_index(8, 0), 7);
/// assert_eq!(mirrored_index(8, 1), 6);
/// assert_eq!(mirrored_index(8, 7), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn mirrored_index(len: usize, p: usize) -> usize {
    len - 1 - p
}

//! Arena-based AVL tree ordered map.
//!
//! [`AvlMap`] keeps key/value entries in a height-balanced binary search
//! tree. Instead of raw pointers, every node link (parent, left, right) is
//! an `Option<u32>` index into a `Vec`-backed arena owned by the map. The
//! parent index is a non-owning back-reference, so rotations and the
//! bottom-up rebalancing walk mutate links freely without aliased mutable
//! references.
//!
//! Insert, lookup and delete are O(log n). Keys are unique: inserting an
//! existing key overwrites its value. Lookup misses are normal results,
//! while deleting a missing key is a caller error ([`AvlError::KeyNotFound`]).
//!
//! The map is single-threaded: mutation takes `&mut self` end to end, and
//! the borrow checker rules out mutating during an in-progress traversal.
//! Embedders that need shared access must wrap the whole map in one lock.
//!
//! ```
//! use avl_map::AvlMap;
//!
//! let mut map = AvlMap::<i32, &str>::new();
//! map.insert(2, "two");
//! map.insert(1, "one");
//! map.insert(3, "three");
//! assert_eq!(map.get(&2), Some(&"two"));
//! map.delete(&1).unwrap();
//! let keys: Vec<i32> = map.keys().copied().collect();
//! assert_eq!(keys, vec![2, 3]);
//! ```

mod error;
mod node;
mod tree;

pub use error::AvlError;
pub use tree::AvlMap;

use thiserror::Error;

/// Errors returned by mutating map operations.
///
/// Lookup misses are not errors: `get` and `contains` report absence as a
/// normal result. Only `delete` treats a missing key as a caller error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AvlError {
    /// The key is not in the tree.
    #[error("key not in tree")]
    KeyNotFound,
}

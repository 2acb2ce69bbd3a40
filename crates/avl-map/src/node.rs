/// One key/value entry in the tree arena.
///
/// All three links (`p`, `l`, `r`) are `Option<u32>` indices into the
/// map's `Vec`-backed arena; `p` is a non-owning back-reference used for
/// upward walks and rotation bookkeeping.
#[derive(Clone, Debug)]
pub(crate) struct AvlNode<K, V> {
    pub(crate) p: Option<u32>,
    pub(crate) l: Option<u32>,
    pub(crate) r: Option<u32>,
    pub(crate) k: K,
    pub(crate) v: V,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: u32,
}

impl<K, V> AvlNode<K, V> {
    pub(crate) fn new(k: K, v: V) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            k,
            v,
            height: 1,
        }
    }
}

//! Node metadata records and the index type used to name them.

/// Index into [`Allocator::nodes`](super::Allocator). A plain newtype rather
/// than `Option<u32>`: keeping `Node` a flat `Copy` struct avoids reasoning
/// about niche layout across the four lists a node can sit in at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const UNUSED: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_unused(self) -> bool {
        self.0 == Self::UNUSED.0
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        Self::UNUSED
    }
}

/// Metadata for a single run of the managed index space.
///
/// Every live node (free or used) participates in the offset-ordered
/// neighbor list via `nbr_prev`/`nbr_next`. A free node additionally
/// participates in its size-class's bucket list via `bin_prev`/`bin_next`; a
/// used node has both cleared to [`NodeIndex::UNUSED`].
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub data_offset: u32,
    pub data_size: u32,

    pub bin_prev: NodeIndex,
    pub bin_next: NodeIndex,

    pub nbr_prev: NodeIndex,
    pub nbr_next: NodeIndex,

    pub used: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            data_offset: 0,
            data_size: 0,
            bin_prev: NodeIndex::UNUSED,
            bin_next: NodeIndex::UNUSED,
            nbr_prev: NodeIndex::UNUSED,
            nbr_next: NodeIndex::UNUSED,
            used: false,
        }
    }
}

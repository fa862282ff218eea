//! Offset-based suballocator.
//!
//! Partitions a contiguous index space `[0, size)` into used/free runs and
//! answers [`Allocator::allocate`]/[`Allocator::free`] in O(1) worst case,
//! merging adjacent free runs on release. Originally used to suballocate
//! ranges inside fixed-size GPU buffers and descriptor pools; the algorithm
//! itself only knows about integer offsets, so it is lifted here as a
//! standalone data structure with no GPU dependency.
//!
//! Ported from Sebastian Aaltonen's `OffsetAllocator` (MIT licensed), by way
//! of this engine's C port of the same.
//!
//! Not thread-safe: wrap in a mutex if shared across threads. Does not
//! resize the managed region, defragment, or persist state — see the
//! top-level design notes for the full non-goal list.

mod bitmap;
mod config;
mod error;
mod node;
mod smallfloat;

pub use config::AllocatorConfig;
pub use error::AllocatorError;
pub use node::NodeIndex;

use bitmap::Bitmap;
use node::Node;

/// A live or failed allocation handle.
///
/// `offset` is redundant with `nodes[metadata].data_offset` at issue time,
/// but is carried separately so callers can store just the `u32` offset and
/// still round-trip it through [`Allocator::free`] alongside `metadata`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub offset: u32,
    pub metadata: NodeIndex,
}

impl Allocation {
    pub const NO_SPACE: Allocation = Allocation {
        offset: u32::MAX,
        metadata: NodeIndex::UNUSED,
    };
}

/// Snapshot of overall free space, as returned by [`Allocator::storage_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageReport {
    pub total_free: u32,
    pub largest_free_region: u32,
}

/// Per-bucket free space breakdown, as returned by
/// [`Allocator::storage_report_full`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinReport {
    pub bucket_size: u32,
    pub free_count: u32,
}

#[derive(Debug)]
pub struct Allocator {
    config: AllocatorConfig,
    free_storage: u32,

    bitmap: Bitmap,
    bin_heads: Vec<NodeIndex>,

    nodes: Vec<Node>,
    free_nodes: Vec<NodeIndex>,
}

impl Allocator {
    /// Constructs an allocator with `size` units of space and up to
    /// `max_allocs` simultaneously live (used or free) nodes.
    pub fn new(size: u32, max_allocs: u32) -> Result<Self, AllocatorError> {
        Self::with_config(AllocatorConfig::new(size).with_max_allocs(max_allocs))
    }

    pub fn with_config(config: AllocatorConfig) -> Result<Self, AllocatorError> {
        config.validate()?;

        let mut allocator = Self {
            config,
            free_storage: 0,
            bitmap: Bitmap::new(),
            bin_heads: vec![NodeIndex::UNUSED; smallfloat_bucket_count()],
            nodes: vec![Node::default(); config.max_allocs as usize],
            free_nodes: Vec::with_capacity(config.max_allocs as usize),
        };
        allocator.reset();

        log::debug!(
            "allocator constructed: size={} max_allocs={}",
            config.size,
            config.max_allocs
        );
        Ok(allocator)
    }

    /// Resets the allocator to the post-construction state, reusing the same
    /// backing storage.
    pub fn reset(&mut self) {
        self.free_storage = 0;
        self.bitmap = Bitmap::new();
        self.bin_heads.fill(NodeIndex::UNUSED);
        self.nodes.fill(Node::default());

        self.free_nodes.clear();
        // Stack is filled in reverse so that index 0 is the first to pop.
        for i in (0..self.config.max_allocs).rev() {
            self.free_nodes.push(NodeIndex(i));
        }

        // Whole storage starts as one big free node; allocate() will split
        // remainders off it as requests come in.
        self.insert_into_bin(self.config.size, 0);

        log::debug!("allocator reset: size={}", self.config.size);
        self.debug_check_invariants();
    }

    /// Allocates `size` units, returning a handle disjoint from every other
    /// live allocation, or an error if the request cannot be satisfied.
    pub fn allocate(&mut self, size: u32) -> Result<Allocation, AllocatorError> {
        debug_assert!(size >= 1, "allocate() requires size >= 1");

        let min_bucket = smallfloat::bucket_round_up(size);
        let bucket = match self.bitmap.find_smallest_set_at_or_above(min_bucket) {
            Some(b) => b,
            None => {
                if self.free_nodes.is_empty() {
                    log::warn!("allocate({size}): out of metadata nodes");
                    return Err(AllocatorError::OutOfNodes);
                }
                log::warn!("allocate({size}): no free region large enough");
                return Err(AllocatorError::OutOfSpace);
            }
        };

        let node_index = self.bin_heads[bucket as usize];
        let total_size = self.nodes[node_index.0 as usize].data_size;
        let data_offset = self.nodes[node_index.0 as usize].data_offset;

        // A split remainder needs a free node slot; an exact-fit allocation
        // reuses this node's own slot and needs none, even if the pool is
        // otherwise exhausted.
        if total_size > size && self.free_nodes.is_empty() {
            log::warn!("allocate({size}): out of metadata nodes for remainder split");
            return Err(AllocatorError::OutOfNodes);
        }

        {
            let node = &mut self.nodes[node_index.0 as usize];

            // Pop this node off the head of its bucket list.
            self.bin_heads[bucket as usize] = node.bin_next;
            node.data_size = size;
            node.used = true;
            node.bin_prev = NodeIndex::UNUSED;
            node.bin_next = NodeIndex::UNUSED;
        }
        let new_head = self.bin_heads[bucket as usize];
        if !new_head.is_unused() {
            self.nodes[new_head.0 as usize].bin_prev = NodeIndex::UNUSED;
        }
        if new_head.is_unused() {
            self.bitmap.clear(bucket);
        }
        self.free_storage -= total_size;

        let remainder = total_size - size;
        if remainder > 0 {
            let remainder_index = self.insert_into_bin(remainder, data_offset + size);

            let old_next = self.nodes[node_index.0 as usize].nbr_next;
            if !old_next.is_unused() {
                self.nodes[old_next.0 as usize].nbr_prev = remainder_index;
            }
            self.nodes[remainder_index.0 as usize].nbr_prev = node_index;
            self.nodes[remainder_index.0 as usize].nbr_next = old_next;
            self.nodes[node_index.0 as usize].nbr_next = remainder_index;
        }

        self.debug_check_invariants();
        Ok(Allocation {
            offset: data_offset,
            metadata: node_index,
        })
    }

    /// Releases a handle previously returned by [`Allocator::allocate`].
    ///
    /// Freeing a handle not returned by this allocator, or freeing the same
    /// handle twice, is a contract violation: it is checked with
    /// `debug_assert!` and is undefined behavior (silent corruption, not
    /// memory-unsafety) in release builds.
    pub fn free(&mut self, allocation: Allocation) {
        let node_index = allocation.metadata;
        debug_assert!(
            self.nodes[node_index.0 as usize].used,
            "double free or foreign handle: node {:?} is not marked used",
            node_index
        );

        let mut offset = self.nodes[node_index.0 as usize].data_offset;
        let mut size = self.nodes[node_index.0 as usize].data_size;

        let mut nbr_prev = self.nodes[node_index.0 as usize].nbr_prev;
        let mut nbr_next = self.nodes[node_index.0 as usize].nbr_next;

        if !nbr_prev.is_unused() && !self.nodes[nbr_prev.0 as usize].used {
            let prev = self.nodes[nbr_prev.0 as usize];
            offset = prev.data_offset;
            size += prev.data_size;
            self.remove_from_bin(nbr_prev);
            nbr_prev = prev.nbr_prev;
        }

        if !nbr_next.is_unused() && !self.nodes[nbr_next.0 as usize].used {
            let next = self.nodes[nbr_next.0 as usize];
            size += next.data_size;
            self.remove_from_bin(nbr_next);
            nbr_next = next.nbr_next;
        }

        // Retire the original node's slot; insert_into_bin below will hand
        // out a (possibly different) slot for the combined node.
        self.free_nodes.push(node_index);

        let combined_index = self.insert_into_bin(size, offset);
        self.nodes[combined_index.0 as usize].nbr_prev = nbr_prev;
        self.nodes[combined_index.0 as usize].nbr_next = nbr_next;
        if !nbr_next.is_unused() {
            self.nodes[nbr_next.0 as usize].nbr_prev = combined_index;
        }
        if !nbr_prev.is_unused() {
            self.nodes[nbr_prev.0 as usize].nbr_next = combined_index;
        }

        self.debug_check_invariants();
    }

    /// The size recorded for a handle's node, or 0 for a `NO_SPACE` handle.
    pub fn allocation_size(&self, allocation: Allocation) -> u32 {
        if allocation.metadata.is_unused() {
            return 0;
        }
        self.nodes[allocation.metadata.0 as usize].data_size
    }

    pub fn storage_report(&self) -> StorageReport {
        let largest_free_region = match self.bitmap.highest_set() {
            Some(bucket) => smallfloat::bucket_size(bucket),
            None => 0,
        };
        StorageReport {
            total_free: self.free_storage,
            largest_free_region,
        }
    }

    /// Per-bucket free space breakdown across all 256 size classes.
    pub fn storage_report_full(&self) -> [BinReport; bitmap::NUM_LEAF_BINS as usize] {
        std::array::from_fn(|bucket| {
            let mut count = 0;
            let mut cursor = self.bin_heads[bucket];
            while !cursor.is_unused() {
                count += 1;
                cursor = self.nodes[cursor.0 as usize].bin_next;
            }
            BinReport {
                bucket_size: smallfloat::bucket_size(bucket as u32),
                free_count: count,
            }
        })
    }

    pub fn size(&self) -> u32 {
        self.config.size
    }

    pub fn max_allocs(&self) -> u32 {
        self.config.max_allocs
    }

    // -- internal list operations -------------------------------------------

    /// Inserts a newly-free run of `size` at `offset`, consuming a slot from
    /// `free_nodes`. Returns the index of the node now holding it.
    fn insert_into_bin(&mut self, size: u32, offset: u32) -> NodeIndex {
        let bucket = smallfloat::bucket_round_down(size);

        let old_head = self.bin_heads[bucket as usize];
        if old_head.is_unused() {
            self.bitmap.set(bucket);
        }

        let node_index = self
            .free_nodes
            .pop()
            .expect("caller guarantees a free node slot is available before splitting or merging");

        self.nodes[node_index.0 as usize] = Node {
            data_offset: offset,
            data_size: size,
            bin_next: old_head,
            ..Node::default()
        };

        if !old_head.is_unused() {
            self.nodes[old_head.0 as usize].bin_prev = node_index;
        }
        self.bin_heads[bucket as usize] = node_index;
        self.free_storage += size;

        node_index
    }

    /// Removes a free node from its bucket list and retires its slot back
    /// onto `free_nodes`.
    fn remove_from_bin(&mut self, node_index: NodeIndex) {
        let node = self.nodes[node_index.0 as usize];

        if !node.bin_prev.is_unused() {
            self.nodes[node.bin_prev.0 as usize].bin_next = node.bin_next;
            if !node.bin_next.is_unused() {
                self.nodes[node.bin_next.0 as usize].bin_prev = node.bin_prev;
            }
        } else {
            let bucket = smallfloat::bucket_round_down(node.data_size);
            self.bin_heads[bucket as usize] = node.bin_next;
            if !node.bin_next.is_unused() {
                self.nodes[node.bin_next.0 as usize].bin_prev = NodeIndex::UNUSED;
            }
            if self.bin_heads[bucket as usize].is_unused() {
                self.bitmap.clear(bucket);
            }
        }

        self.free_nodes.push(node_index);
        self.free_storage -= node.data_size;
    }

    #[cfg(debug_assertions)]
    fn debug_check_invariants(&self) {
        self.check_invariants();
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_invariants(&self) {}

    /// Re-derives every invariant from §3 of the design doc from scratch and
    /// panics if any of them is violated. Always compiled in (so the test
    /// suite can call it directly); only invoked automatically by the public
    /// API when `debug_assertions` are on.
    pub fn check_invariants(&self) {
        // Coverage + ordering: walk the neighbor list from the lowest offset.
        let Some(first) = self.find_lowest_offset_node() else {
            return;
        };

        let mut visited = vec![false; self.nodes.len()];
        let mut total_covered: u64 = 0;
        let mut free_total: u64 = 0;
        let mut cursor = first;
        let mut prev: Option<Node> = None;
        let mut count = 0u32;

        assert_eq!(
            self.nodes[cursor.0 as usize].data_offset, 0,
            "first neighbor-list node must start at offset 0"
        );

        loop {
            assert!(
                !visited[cursor.0 as usize],
                "neighbor list cycle detected at node {:?}",
                cursor
            );
            visited[cursor.0 as usize] = true;
            count += 1;

            let node = self.nodes[cursor.0 as usize];
            if let Some(p) = prev {
                assert_eq!(
                    p.data_offset + p.data_size,
                    node.data_offset,
                    "neighbor-list gap or overlap at node {:?}",
                    cursor
                );
                assert!(
                    !(!p.used && !node.used),
                    "two adjacent free neighbors at node {:?}: merge invariant violated",
                    cursor
                );
            }
            total_covered += node.data_size as u64;
            if !node.used {
                free_total += node.data_size as u64;
            }

            prev = Some(node);
            let next = node.nbr_next;
            if next.is_unused() {
                assert_eq!(
                    node.data_offset + node.data_size,
                    self.config.size,
                    "last neighbor-list node must end at allocator size"
                );
                break;
            }
            cursor = next;
        }

        assert_eq!(
            total_covered, self.config.size as u64,
            "neighbor list does not cover the whole managed region"
        );
        assert_eq!(
            free_total, self.free_storage as u64,
            "free_storage accounting mismatch"
        );

        // Node-pool partition: free_nodes and neighbor-list nodes must
        // partition [0, max_allocs).
        let mut on_free_stack = vec![false; self.nodes.len()];
        for idx in &self.free_nodes {
            assert!(
                !on_free_stack[idx.0 as usize],
                "node {:?} appears twice on the free-node stack",
                idx
            );
            on_free_stack[idx.0 as usize] = true;
        }
        for i in 0..self.nodes.len() {
            assert!(
                visited[i] != on_free_stack[i],
                "node {i} is neither live nor free, or is both"
            );
        }

        // Bucket + bitmap consistency.
        for bucket in 0..self.bin_heads.len() as u32 {
            let mut cursor = self.bin_heads[bucket as usize];
            let mut any = false;
            while !cursor.is_unused() {
                any = true;
                let node = self.nodes[cursor.0 as usize];
                assert!(!node.used, "bucket {bucket} lists a used node");
                assert_eq!(
                    smallfloat::bucket_round_down(node.data_size),
                    bucket,
                    "node {:?} filed under the wrong bucket",
                    cursor
                );
                cursor = node.bin_next;
            }
            assert_eq!(
                self.bitmap.is_bucket_set(bucket),
                any,
                "bitmap disagrees with bucket {bucket}'s occupancy"
            );
        }
    }

    fn find_lowest_offset_node(&self) -> Option<NodeIndex> {
        // Any live node works as a starting point for validating the list;
        // the lowest-offset one is found by walking nbr_prev from any live
        // node, so first find one live node via the bucket heads or a used
        // node scan.
        for (i, node) in self.nodes.iter().enumerate() {
            let idx = NodeIndex(i as u32);
            if self.free_nodes.contains(&idx) {
                continue;
            }
            let mut cursor = idx;
            while !self.nodes[cursor.0 as usize].nbr_prev.is_unused() {
                cursor = self.nodes[cursor.0 as usize].nbr_prev;
            }
            let _ = node;
            return Some(cursor);
        }
        None
    }
}

fn smallfloat_bucket_count() -> usize {
    bitmap::NUM_LEAF_BINS as usize
}

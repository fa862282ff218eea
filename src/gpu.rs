//! GPU device abstraction sketch.
//!
//! The engine this crate is drawn from suballocates descriptor-pool and
//! vertex/index-buffer ranges out of [`crate::alloc::Allocator`]-managed
//! regions; this module sketches just enough of that vocabulary (a named
//! GPU buffer and the handle an allocation within it produces) to show where
//! the allocator plugs in, without depending on a real graphics backend.

use crate::alloc::{Allocation, Allocator, AllocatorError};

/// A suballocated range inside a [`GpuBuffer`].
#[derive(Debug, Clone, Copy)]
pub struct BufferRange {
    pub offset: u32,
    pub size: u32,
}

/// A fixed-size GPU buffer whose byte range is handed out through an
/// [`Allocator`], mirroring the engine's vertex/index pool buffers.
#[derive(Debug)]
pub struct GpuBuffer {
    label: &'static str,
    capacity_bytes: u32,
    allocator: Allocator,
}

impl GpuBuffer {
    pub fn new(label: &'static str, capacity_bytes: u32, max_allocs: u32) -> Result<Self, AllocatorError> {
        Ok(Self {
            label,
            capacity_bytes,
            allocator: Allocator::new(capacity_bytes, max_allocs)?,
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn capacity_bytes(&self) -> u32 {
        self.capacity_bytes
    }

    /// Suballocates `size` bytes out of the buffer. Actual device-side
    /// writes (`queue.write_buffer`-style calls in the engine) are not
    /// modeled here; this only hands back the byte range.
    pub fn suballocate(&mut self, size: u32) -> Result<(Allocation, BufferRange), AllocatorError> {
        let allocation = self.allocator.allocate(size)?;
        Ok((
            allocation,
            BufferRange {
                offset: allocation.offset,
                size,
            },
        ))
    }

    pub fn free(&mut self, allocation: Allocation) {
        self.allocator.free(allocation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suballocates_disjoint_ranges() {
        let mut buffer = GpuBuffer::new("Vertices", 4096, 32).unwrap();
        let (a, range_a) = buffer.suballocate(256).unwrap();
        let (_, range_b) = buffer.suballocate(256).unwrap();
        assert_eq!(range_a.offset, 0);
        assert_eq!(range_b.offset, 256);
        buffer.free(a);
    }
}

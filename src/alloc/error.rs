//! Error type for the two recoverable allocator failure modes, plus the
//! construction-time precondition check. Shaped like the crate's other
//! subsystem error enums: a plain `Debug` enum with a hand-written
//! `Display`/`Error` impl rather than a `thiserror` derive.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocatorError {
    /// `size == 0`, `max_allocs == 0`, or `max_allocs` too large to be
    /// represented alongside the `NodeIndex::UNUSED` sentinel.
    InvalidConfig { reason: &'static str },
    /// The node-metadata pool is exhausted: every slot is either on the
    /// neighbor list or would need to be to satisfy the request.
    OutOfNodes,
    /// No free bucket at or above the size class the request rounds up to
    /// has any space left.
    OutOfSpace,
}

impl std::fmt::Display for AllocatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocatorError::InvalidConfig { reason } => {
                write!(f, "invalid allocator configuration: {reason}")
            }
            AllocatorError::OutOfNodes => {
                write!(f, "allocator has no free metadata nodes left")
            }
            AllocatorError::OutOfSpace => {
                write!(f, "allocator has no free region large enough for this request")
            }
        }
    }
}

impl std::error::Error for AllocatorError {}

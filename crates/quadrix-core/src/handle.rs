//! Handles into an [`ExprArena`](crate::ExprArena).

use std::fmt;

/// Index of a node inside one arena.
///
/// A handle is only meaningful for the arena that produced it. Because the
/// arena hash-conses its nodes, two handles from the same arena compare equal
/// exactly when the expressions they denote are structurally identical.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    /// Wraps a raw node index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw node index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the node index as a `usize` for slice access.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_four_bytes() {
        assert_eq!(std::mem::size_of::<ExprHandle>(), 4);
    }

    #[test]
    fn test_slot_matches_index() {
        let h = ExprHandle::new(7);
        assert_eq!(h.slot(), 7);
        assert_eq!(format!("{h:?}"), "Expr(7)");
    }
}

//! Optimistic concurrency primitives.
//!
//! There is no multi-key transaction available against the backing store, so
//! every contended write is a version-conditioned read-modify-write. Stores
//! check an [`ExpectedVersion`] before committing; callers retry on mismatch.

/// Version expectation for a conditional write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent writes and seeding).
    Any,
    /// Require the stored value to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_matches_everything() {
        assert!(ExpectedVersion::Any.matches(0));
        assert!(ExpectedVersion::Any.matches(42));
    }

    #[test]
    fn exact_matches_only_its_version() {
        assert!(ExpectedVersion::Exact(3).matches(3));
        assert!(!ExpectedVersion::Exact(3).matches(4));
        assert!(!ExpectedVersion::Exact(3).matches(0));
    }
}

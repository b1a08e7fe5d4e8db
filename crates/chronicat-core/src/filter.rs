//! Volatile-field exclusion.
//!
//! Some top-level fields are stamped by the service itself on every write.
//! Changes to them are noise, so operations whose path names one of them
//! exactly are dropped before a changeset is built.

use crate::diff::PatchOp;
use std::collections::BTreeSet;

/// Paths excluded from changesets unless configured otherwise.
pub const DEFAULT_EXCLUDED_PATHS: [&str; 3] = ["/created", "/lastUpload", "/lastUpdate"];

/// Drops operations whose path exactly equals an excluded path.
///
/// Matching is exact: `/created/by` is kept even though `/created` is excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExclusionFilter {
    excluded: BTreeSet<String>,
}

impl FieldExclusionFilter {
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.contains(path)
    }

    /// Keep the operations not excluded, in their original order.
    pub fn apply(&self, ops: Vec<PatchOp>) -> Vec<PatchOp> {
        ops.into_iter()
            .filter(|op| !self.is_excluded(&op.path))
            .collect()
    }
}

impl Default for FieldExclusionFilter {
    fn default() -> Self {
        Self::with_paths(DEFAULT_EXCLUDED_PATHS)
    }
}

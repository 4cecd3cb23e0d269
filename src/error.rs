use thiserror::Error;

/// Errors returned by [`SnapshotSet`](crate::SnapshotSet) and
/// [`EntrySet`](crate::EntrySet) mutators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    /// Snapshot views are read-only; `op` names the rejected operation.
    #[error("unsupported operation `{op}` on an immutable snapshot view")]
    UnsupportedOperation { op: &'static str },
}

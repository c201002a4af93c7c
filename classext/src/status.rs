use serde::{Deserialize, Serialize};

/// Status codes returned across the host boundary.
///
/// This is the whole vocabulary the host sees; diagnostic detail goes to the
/// log instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassExtStatus {
    Success,
    /// Bad export count, unsupported client version, or a repeated bind.
    InvalidParameter,
    /// The singleton could not be allocated.
    InsufficientResources,
    ObjectNameCollision,
    /// A generated device name did not fit the name buffer.
    BufferOverflow,
    Unsuccessful,
}

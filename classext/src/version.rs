use std::fmt;

use serde::{Deserialize, Serialize};

use crate::export_table::ExportTable;

/// Version triple of a class library or of a client built against one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryVersion {
    pub major: u16,
    pub minor: u16,
    #[serde(default)]
    pub build: u16,
}

impl LibraryVersion {
    pub const fn new(major: u16, minor: u16, build: u16) -> Self {
        Self {
            major,
            minor,
            build,
        }
    }
}

impl Default for LibraryVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// What a client asks for when it attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBindRequest {
    /// Number of function slots the client was compiled to receive.
    pub function_table_count: usize,
    pub version: LibraryVersion,
}

impl ClientBindRequest {
    pub fn new(function_table_count: usize, version: LibraryVersion) -> Self {
        Self {
            function_table_count,
            version,
        }
    }
}

/// Why a bind request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RejectReason {
    #[error("incorrect function count: requested {requested}")]
    InvalidExportCount { requested: usize },

    #[error("unsupported minor version: requested {requested}, supported <= {supported_max}")]
    UnsupportedMinorVersion { requested: u16, supported_max: u16 },

    #[error("major version mismatch: requested {requested}, library is {expected}")]
    MajorVersionMismatch { requested: u16, expected: u16 },
}

/// Decides whether a client's declared interface shape can be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionPolicy {
    /// Version this library registers with the host.
    pub library: LibraryVersion,
    /// Newest client minor version this library can serve.
    pub max_client_minor: u16,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            library: LibraryVersion::default(),
            max_client_minor: 0,
        }
    }
}

impl VersionPolicy {
    pub fn new(library: LibraryVersion, max_client_minor: u16) -> Self {
        Self {
            library,
            max_client_minor,
        }
    }

    /// Validate a request against `table` and return the exact number of
    /// exports to hand out.
    ///
    /// The count must be a published release length, never merely close to
    /// one. A newer client minor is refused even when its count is valid.
    pub fn validate<F: Copy>(
        &self,
        request: &ClientBindRequest,
        table: &ExportTable<F>,
    ) -> Result<usize, RejectReason> {
        if request.version.major != self.library.major {
            return Err(RejectReason::MajorVersionMismatch {
                requested: request.version.major,
                expected: self.library.major,
            });
        }
        if request.version.minor > self.max_client_minor {
            return Err(RejectReason::UnsupportedMinorVersion {
                requested: request.version.minor,
                supported_max: self.max_client_minor,
            });
        }
        if !table.is_valid_count(request.function_table_count) {
            return Err(RejectReason::InvalidExportCount {
                requested: request.function_table_count,
            });
        }
        Ok(request.function_table_count)
    }
}

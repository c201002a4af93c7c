use crate::status::ClassExtStatus;
use crate::version::RejectReason;

/// Errors produced while assembling an export table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("export table has no exports")]
    EmptyTable,

    #[error("release {release} publishes no new exports")]
    EmptyRelease { release: usize },
}

/// Errors returned by a client bind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("bind rejected: {0}")]
    Rejected(#[from] RejectReason),

    #[error("capability slot already holds a grant; unbind before binding again")]
    AlreadyBound,
}

impl BindError {
    /// Every bind failure is reported to the host as an invalid parameter.
    pub fn status(&self) -> ClassExtStatus {
        ClassExtStatus::InvalidParameter
    }
}

/// Errors reported by the host framework primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("object name collision: {0}")]
    NameCollision(String),

    #[error("insufficient resources")]
    InsufficientResources,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{0}")]
    Other(String),
}

impl HostError {
    pub fn status(&self) -> ClassExtStatus {
        match self {
            HostError::NameCollision(_) => ClassExtStatus::ObjectNameCollision,
            HostError::InsufficientResources => ClassExtStatus::InsufficientResources,
            HostError::InvalidParameter(_) => ClassExtStatus::InvalidParameter,
            HostError::Other(_) => ClassExtStatus::Unsuccessful,
        }
    }
}

/// Errors returned while creating the singleton extension object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("singleton allocation failed")]
    AllocationFailed,

    #[error("extension object already exists (state: {state})")]
    AlreadyRegistered { state: crate::lifecycle::LibraryState },

    #[error("device name `{name}` exceeds {max_len} characters")]
    NameTooLong { name: String, max_len: usize },

    #[error("invalid naming config: {0}")]
    InvalidNaming(String),

    #[error("no free device name after {attempts} attempts")]
    NameCollisionExhausted { attempts: u32 },

    #[error("device creation failed: {0}")]
    DeviceCreation(HostError),

    #[error("class library registration failed: {0}")]
    Registration(HostError),
}

impl CreateError {
    pub fn status(&self) -> ClassExtStatus {
        match self {
            CreateError::AllocationFailed => ClassExtStatus::InsufficientResources,
            CreateError::AlreadyRegistered { .. } => ClassExtStatus::Unsuccessful,
            CreateError::InvalidNaming(_) => ClassExtStatus::InvalidParameter,
            CreateError::NameTooLong { .. } => ClassExtStatus::BufferOverflow,
            CreateError::NameCollisionExhausted { .. } => ClassExtStatus::ObjectNameCollision,
            CreateError::DeviceCreation(err) | CreateError::Registration(err) => err.status(),
        }
    }
}

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

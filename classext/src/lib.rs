pub mod config;
pub mod error;
pub mod export_table;
pub mod extension;
pub mod host;
pub mod lifecycle;
pub mod negotiator;
pub mod singleton;
pub mod status;
pub mod version;

// Re-export key types for convenience.
pub use config::{ClassExtensionConfig, DEFAULT_BASE_NAME, NamingConfig};
pub use error::{BindError, ConfigError, ConfigResult, CreateError, HostError, TableError};
pub use export_table::{CapabilityExport, CapabilitySlot, ExportTable, ExportTableBuilder};
pub use extension::{ClassBindInfo, ClassExtension};
pub use host::{ClassLibraryInfo, ClientGlobals, HostFramework};
pub use lifecycle::{LibraryState, LifecycleEvent, LifecycleTracker};
pub use negotiator::BindingNegotiator;
pub use singleton::{ExtensionSingleton, RegisteredObject, device_name};
pub use status::ClassExtStatus;
pub use version::{ClientBindRequest, LibraryVersion, RejectReason, VersionPolicy};

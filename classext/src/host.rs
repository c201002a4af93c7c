//! Boundary with the host device framework.
//!
//! The host owns device allocation, naming and class library registration.
//! This crate only drives those primitives in the right order and unwinds
//! them on failure.

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::version::LibraryVersion;

/// What the extension registers with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLibraryInfo {
    pub version: LibraryVersion,
}

/// Identity of the attaching client, supplied by the host. Only used for
/// diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientGlobals {
    pub driver_name: String,
}

impl ClientGlobals {
    pub fn new(driver_name: impl Into<String>) -> Self {
        Self {
            driver_name: driver_name.into(),
        }
    }
}

/// Device and registration primitives provided by the host framework.
pub trait HostFramework {
    /// Initialization state for a control device, owned by the caller until
    /// a device is created from it.
    type DeviceInit;
    /// A created control device. Deleting it also drops its registration.
    type Device;

    /// Allocate initialization state for a kernel-only control device.
    /// `None` means the host is out of resources.
    fn allocate_control_device_init(&mut self) -> Option<Self::DeviceInit>;

    fn assign_name(&mut self, init: &mut Self::DeviceInit, name: &str) -> Result<(), HostError>;

    /// Create a device, consuming `init` on success. On failure `init` is
    /// handed back so the caller can retry or free it.
    fn create_device(
        &mut self,
        init: Self::DeviceInit,
    ) -> Result<Self::Device, (HostError, Self::DeviceInit)>;

    fn finish_initializing(&mut self, device: &Self::Device);

    /// Register the class library under `device_name` so clients can bind.
    fn register_class_library(
        &mut self,
        info: &ClassLibraryInfo,
        registry_path: &str,
        device_name: &str,
    ) -> Result<(), HostError>;

    fn delete_device(&mut self, device: Self::Device);

    /// Free initialization state that never became a device.
    fn free_device_init(&mut self, init: Self::DeviceInit);
}

//! In-memory host framework and sample export tables for integration tests.

use std::collections::{HashMap, HashSet};

use classext_core::{
    CapabilityExport, ClassLibraryInfo, ClientBindRequest, ExportTable, HostError, HostFramework,
    LibraryVersion, TableError,
};

/// Capabilities used by the sample tables. Each variant stands in for a
/// function reference at a fixed calling-convention index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    A,
    B,
    C,
    D,
    E,
}

fn export(cap: Capability) -> CapabilityExport<Capability> {
    let name = match cap {
        Capability::A => "register_client",
        Capability::B => "unregister_client",
        Capability::C => "pre_device_create",
        Capability::D => "post_device_create",
        Capability::E => "interrupt_lock",
    };
    CapabilityExport::new(name, cap)
}

/// `[A, B, C, D]`, valid counts `{4}`.
pub fn four_entry_table() -> Result<ExportTable<Capability>, TableError> {
    ExportTable::single_release(
        [Capability::A, Capability::B, Capability::C, Capability::D].map(export),
    )
}

/// `[A, B, C, D, E]`, valid counts `{4, 5}`.
pub fn five_entry_table() -> Result<ExportTable<Capability>, TableError> {
    ExportTable::builder()
        .release([Capability::A, Capability::B, Capability::C, Capability::D].map(export))
        .release([export(Capability::E)])
        .build()
}

pub fn request(count: usize, minor: u16) -> ClientBindRequest {
    ClientBindRequest::new(count, LibraryVersion::new(1, minor, 0))
}

#[derive(Debug, PartialEq, Eq)]
pub struct FakeDeviceInit {
    id: u64,
    name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeDevice {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub device_name: String,
    pub registry_path: String,
    pub version: LibraryVersion,
}

/// Host double with scripted failures and leak accounting.
#[derive(Debug, Default)]
pub struct FakeHost {
    next_id: u64,
    reserved_names: HashSet<String>,
    live_inits: HashSet<u64>,
    live_devices: HashMap<u64, String>,
    registrations: Vec<Registration>,
    attempted_names: Vec<String>,

    /// Make `allocate_control_device_init` return `None`.
    pub fail_allocation: bool,
    /// Report every name as taken.
    pub collide_always: bool,
    pub fail_assign_name: Option<HostError>,
    /// Non-collision failure for `create_device`.
    pub fail_create: Option<HostError>,
    pub fail_registration: Option<HostError>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend another object still holds `name`.
    pub fn reserve_name(&mut self, name: impl Into<String>) {
        self.reserved_names.insert(name.into());
    }

    pub fn live_init_count(&self) -> usize {
        self.live_inits.len()
    }

    pub fn live_device_count(&self) -> usize {
        self.live_devices.len()
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Every name passed to `assign_name`, in order.
    pub fn attempted_names(&self) -> &[String] {
        &self.attempted_names
    }

    pub fn is_clean(&self) -> bool {
        self.live_inits.is_empty() && self.live_devices.is_empty() && self.registrations.is_empty()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl HostFramework for FakeHost {
    type DeviceInit = FakeDeviceInit;
    type Device = FakeDevice;

    fn allocate_control_device_init(&mut self) -> Option<FakeDeviceInit> {
        if self.fail_allocation {
            return None;
        }
        let id = self.next_id();
        self.live_inits.insert(id);
        Some(FakeDeviceInit { id, name: None })
    }

    fn assign_name(&mut self, init: &mut FakeDeviceInit, name: &str) -> Result<(), HostError> {
        self.attempted_names.push(name.to_string());
        if let Some(err) = self.fail_assign_name.clone() {
            return Err(err);
        }
        init.name = Some(name.to_string());
        Ok(())
    }

    fn create_device(
        &mut self,
        init: FakeDeviceInit,
    ) -> Result<FakeDevice, (HostError, FakeDeviceInit)> {
        let Some(name) = init.name.clone() else {
            return Err((HostError::InvalidParameter("unnamed device".into()), init));
        };
        if self.collide_always || self.reserved_names.contains(&name) {
            return Err((HostError::NameCollision(name), init));
        }
        if let Some(err) = self.fail_create.clone() {
            return Err((err, init));
        }

        self.live_inits.remove(&init.id);
        self.reserved_names.insert(name.clone());
        let id = self.next_id();
        self.live_devices.insert(id, name.clone());
        Ok(FakeDevice { id, name })
    }

    fn finish_initializing(&mut self, _device: &FakeDevice) {}

    fn register_class_library(
        &mut self,
        info: &ClassLibraryInfo,
        registry_path: &str,
        device_name: &str,
    ) -> Result<(), HostError> {
        if let Some(err) = self.fail_registration.clone() {
            return Err(err);
        }
        self.registrations.push(Registration {
            device_name: device_name.to_string(),
            registry_path: registry_path.to_string(),
            version: info.version,
        });
        Ok(())
    }

    fn delete_device(&mut self, device: FakeDevice) {
        self.live_devices.remove(&device.id);
        self.reserved_names.remove(&device.name);
        self.registrations
            .retain(|r| r.device_name != device.name);
    }

    fn free_device_init(&mut self, init: FakeDeviceInit) {
        self.live_inits.remove(&init.id);
    }
}

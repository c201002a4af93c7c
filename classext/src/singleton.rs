//! The one process-wide extension object.
//!
//! Creation and destruction are serialized by the host; nothing here locks.
//! The object is an explicitly owned handle rather than a global.

use tracing::{debug, error, info, warn};

use crate::config::NamingConfig;
use crate::error::{CreateError, HostError};
use crate::host::{ClassLibraryInfo, HostFramework};
use crate::lifecycle::{LibraryState, LifecycleEvent, LifecycleTracker};

/// A registered extension object: its device name and the host device
/// backing the registration.
#[derive(Debug)]
pub struct RegisteredObject<D> {
    name: String,
    device: D,
}

impl<D> RegisteredObject<D> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

/// Format the device name for retry `index`, refusing names longer than
/// `max_len` characters.
pub fn device_name(base_name: &str, index: u32, max_len: usize) -> Result<String, CreateError> {
    let name = format!("{base_name}{index}");
    if name.chars().count() > max_len {
        return Err(CreateError::NameTooLong { name, max_len });
    }
    Ok(name)
}

/// Owner of the singleton registration.
#[derive(Debug)]
pub struct ExtensionSingleton<D> {
    object: Option<RegisteredObject<D>>,
    tracker: LifecycleTracker,
}

impl<D> Default for ExtensionSingleton<D> {
    fn default() -> Self {
        Self {
            object: None,
            tracker: LifecycleTracker::new(),
        }
    }
}

impl<D> ExtensionSingleton<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LibraryState {
        self.tracker.state()
    }

    pub fn object(&self) -> Option<&RegisteredObject<D>> {
        self.object.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.object.as_ref().map(RegisteredObject::name)
    }

    pub fn history(&self) -> &[LifecycleEvent] {
        self.tracker.events()
    }

    pub fn tracker(&self) -> &LifecycleTracker {
        &self.tracker
    }

    /// Create the control device under the first free generated name and
    /// register the class library with the host.
    ///
    /// `naming` is checked before the host is touched. Only a name collision
    /// moves on to the next name. Any other failure aborts, and every
    /// partially acquired host resource is released before returning.
    pub fn create<H>(
        &mut self,
        host: &mut H,
        naming: &NamingConfig,
        info: &ClassLibraryInfo,
        registry_path: &str,
    ) -> Result<&RegisteredObject<D>, CreateError>
    where
        H: HostFramework<Device = D>,
    {
        let state = self.state();
        if state != LibraryState::Unregistered {
            warn!(%state, "create called on a live extension object");
            return Err(CreateError::AlreadyRegistered { state });
        }
        if let Err(err) = naming.validate() {
            warn!(base_name = %naming.base_name, "create refused: {err}");
            return Err(CreateError::InvalidNaming(err.to_string()));
        }

        self.tracker.transition(LibraryState::Registering, None);
        match Self::create_registered(host, naming, info, registry_path) {
            Ok(object) => {
                info!(name = %object.name, version = %info.version, "class library registered");
                self.tracker
                    .transition(LibraryState::Registered, Some(&object.name));
                Ok(self.object.insert(object))
            }
            Err(err) => {
                error!(base_name = %naming.base_name, "class library creation failed: {err}");
                self.tracker
                    .fail(LibraryState::Unregistered, None, &err.to_string());
                Err(err)
            }
        }
    }

    fn create_registered<H>(
        host: &mut H,
        naming: &NamingConfig,
        info: &ClassLibraryInfo,
        registry_path: &str,
    ) -> Result<RegisteredObject<D>, CreateError>
    where
        H: HostFramework<Device = D>,
    {
        let init = host
            .allocate_control_device_init()
            .ok_or(CreateError::AllocationFailed)?;
        let (name, device) = Self::create_named_device(host, init, naming)?;

        host.finish_initializing(&device);
        if let Err(err) = host.register_class_library(info, registry_path, &name) {
            host.delete_device(device);
            return Err(CreateError::Registration(err));
        }
        Ok(RegisteredObject { name, device })
    }

    /// Walk `base0`, `base1`, ... until the host accepts a name. Frees `init`
    /// on every path where no device consumed it.
    fn create_named_device<H>(
        host: &mut H,
        mut init: H::DeviceInit,
        naming: &NamingConfig,
    ) -> Result<(String, D), CreateError>
    where
        H: HostFramework<Device = D>,
    {
        for index in 0..naming.max_name_attempts {
            let name = match device_name(&naming.base_name, index, naming.max_name_len) {
                Ok(name) => name,
                Err(err) => {
                    host.free_device_init(init);
                    return Err(err);
                }
            };

            if let Err(err) = host.assign_name(&mut init, &name) {
                host.free_device_init(init);
                return Err(CreateError::DeviceCreation(err));
            }

            match host.create_device(init) {
                Ok(device) => return Ok((name, device)),
                Err((HostError::NameCollision(taken), returned)) => {
                    debug!(name = %taken, index, "device name in use; trying next suffix");
                    init = returned;
                }
                Err((err, returned)) => {
                    host.free_device_init(returned);
                    return Err(CreateError::DeviceCreation(err));
                }
            }
        }

        host.free_device_init(init);
        Err(CreateError::NameCollisionExhausted {
            attempts: naming.max_name_attempts,
        })
    }

    /// Release the registration if one is live. Always leaves the singleton
    /// cleared so a later [`create`](Self::create) starts fresh.
    pub fn destroy<H>(&mut self, host: &mut H)
    where
        H: HostFramework<Device = D>,
    {
        // An object is only ever stored while Registered.
        let Some(object) = self.object.take() else {
            debug!(state = %self.state(), "destroy: no live extension object");
            return;
        };

        self.tracker
            .transition(LibraryState::Unregistering, Some(&object.name));
        host.delete_device(object.device);
        info!(name = %object.name, "class library destroyed");
        self.tracker.transition(LibraryState::Unregistered, None);
    }
}

use tracing::{debug, info};

use crate::config::{ClassExtensionConfig, NamingConfig};
use crate::error::ConfigResult;
use crate::export_table::{CapabilitySlot, ExportTable};
use crate::host::{ClassLibraryInfo, ClientGlobals, HostFramework};
use crate::lifecycle::LibraryState;
use crate::negotiator::BindingNegotiator;
use crate::singleton::ExtensionSingleton;
use crate::status::ClassExtStatus;
use crate::version::ClientBindRequest;

/// Bind information exchanged with the host for one client attach.
///
/// The request describes what the client was built against; `function_table`
/// is the client's own buffer.
#[derive(Debug)]
pub struct ClassBindInfo<'a, F> {
    pub request: ClientBindRequest,
    pub function_table: &'a mut CapabilitySlot<F>,
}

/// A class extension as the host sees it: registration info plus the
/// initialize, deinitialize, bind and unbind callbacks.
#[derive(Debug)]
pub struct ClassExtension<F, D> {
    info: ClassLibraryInfo,
    naming: NamingConfig,
    negotiator: BindingNegotiator<F>,
    singleton: ExtensionSingleton<D>,
}

impl<F: Copy, D> ClassExtension<F, D> {
    /// Build an extension from `config`, which is validated first.
    pub fn new(config: &ClassExtensionConfig, table: ExportTable<F>) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            info: ClassLibraryInfo {
                version: config.version,
            },
            naming: config.naming.clone(),
            negotiator: BindingNegotiator::new(table, config.policy()),
            singleton: ExtensionSingleton::new(),
        })
    }

    pub fn info(&self) -> &ClassLibraryInfo {
        &self.info
    }

    pub fn negotiator(&self) -> &BindingNegotiator<F> {
        &self.negotiator
    }

    pub fn singleton(&self) -> &ExtensionSingleton<D> {
        &self.singleton
    }

    pub fn state(&self) -> LibraryState {
        self.singleton.state()
    }

    /// Create the singleton and register with the host. Called once when
    /// the extension is loaded.
    pub fn load<H>(&mut self, host: &mut H, registry_path: &str) -> ClassExtStatus
    where
        H: HostFramework<Device = D>,
    {
        match self
            .singleton
            .create(host, &self.naming, &self.info, registry_path)
        {
            Ok(_) => ClassExtStatus::Success,
            Err(err) => err.status(),
        }
    }

    /// Tear the singleton down. Called when the extension is unloaded.
    pub fn unload<H>(&mut self, host: &mut H)
    where
        H: HostFramework<Device = D>,
    {
        self.singleton.destroy(host);
    }

    /// Host callback run when the class library object is created. There is
    /// nothing to prepare.
    pub fn initialize(&self) -> ClassExtStatus {
        info!(version = %self.info.version, "class library initialize");
        ClassExtStatus::Success
    }

    pub fn deinitialize(&self) {
        info!(version = %self.info.version, "class library deinitialize");
    }

    /// Host callback for a client attach. Rejections are logged in detail
    /// and reported as [`ClassExtStatus::InvalidParameter`].
    pub fn bind_client(
        &self,
        bind_info: &mut ClassBindInfo<'_, F>,
        client: &ClientGlobals,
    ) -> ClassExtStatus {
        match self.negotiator.bind(
            &client.driver_name,
            &bind_info.request,
            bind_info.function_table,
        ) {
            Ok(()) => ClassExtStatus::Success,
            Err(err) => err.status(),
        }
    }

    pub fn unbind_client(&self, bind_info: &mut ClassBindInfo<'_, F>, client: &ClientGlobals) {
        debug!(client = %client.driver_name, "unbind client");
        self.negotiator.unbind(
            &client.driver_name,
            &bind_info.request,
            bind_info.function_table,
        );
    }
}

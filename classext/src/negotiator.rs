use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::BindError;
use crate::export_table::{CapabilitySlot, ExportTable};
use crate::version::{ClientBindRequest, RejectReason, VersionPolicy};

/// Hands clients the slice of the export table their declared version can
/// consume.
///
/// The negotiator holds no per-client state: the table is immutable and the
/// policy is pure, so binds for different clients need no synchronization.
/// Each bind writes only into the caller's own slot.
#[derive(Debug, Clone)]
pub struct BindingNegotiator<F> {
    table: Arc<ExportTable<F>>,
    policy: VersionPolicy,
}

impl<F: Copy> BindingNegotiator<F> {
    pub fn new(table: impl Into<Arc<ExportTable<F>>>, policy: VersionPolicy) -> Self {
        Self {
            table: table.into(),
            policy,
        }
    }

    pub fn table(&self) -> &ExportTable<F> {
        &self.table
    }

    pub fn policy(&self) -> &VersionPolicy {
        &self.policy
    }

    /// Validate `request` and, on success, fill `slot` with exactly the
    /// requested prefix of the export table, in table order.
    ///
    /// On any failure `slot` is left untouched. A slot that already holds a
    /// grant is refused with [`BindError::AlreadyBound`].
    pub fn bind(
        &self,
        client: &str,
        request: &ClientBindRequest,
        slot: &mut CapabilitySlot<F>,
    ) -> Result<(), BindError> {
        if slot.is_granted() {
            warn!(client, granted = slot.len(), "bind refused: client is already bound");
            return Err(BindError::AlreadyBound);
        }

        let count = match self.policy.validate(request, &self.table) {
            Ok(count) => count,
            Err(reason) => {
                warn!(
                    client,
                    requested = request.function_table_count,
                    client_version = %request.version,
                    library_version = %self.policy.library,
                    "bind refused: {reason}"
                );
                return Err(reason.into());
            }
        };

        // validate() only accepts published release lengths, all of which
        // are in range.
        let Some(exports) = self.table.prefix(count) else {
            return Err(RejectReason::InvalidExportCount { requested: count }.into());
        };
        slot.fill(exports);
        debug!(
            client,
            count,
            current = self.table.current_count(),
            client_version = %request.version,
            "client bound"
        );
        Ok(())
    }

    /// Release a client's grant. Always succeeds and never touches the table
    /// or any other client's slot.
    pub fn unbind(&self, client: &str, request: &ClientBindRequest, slot: &mut CapabilitySlot<F>) {
        debug!(
            client,
            requested = request.function_table_count,
            released = slot.len(),
            "client unbound"
        );
        slot.clear();
    }
}

//! Append-only capability export tables.
//!
//! An [`ExportTable`] is built once at load time, release by release. Each
//! release appends its exports to the end of the table and records the new
//! total as a valid export count, so every prefix length a client of some
//! past vintage was built against stays a meaningful slice forever.

use std::collections::BTreeSet;

use crate::error::TableError;

/// One exported capability. Its identity is its position in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityExport<F> {
    name: &'static str,
    function: F,
}

impl<F: Copy> CapabilityExport<F> {
    pub fn new(name: &'static str, function: F) -> Self {
        Self { name, function }
    }

    /// Diagnostic name; never part of the calling convention.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn function(&self) -> F {
        self.function
    }
}

/// Ordered, immutable table of capability exports plus every historically
/// valid prefix length.
#[derive(Debug, Clone)]
pub struct ExportTable<F> {
    exports: Box<[CapabilityExport<F>]>,
    valid_counts: BTreeSet<usize>,
}

impl<F: Copy> ExportTable<F> {
    pub fn builder() -> ExportTableBuilder<F> {
        ExportTableBuilder::default()
    }

    /// A table with a single release: only the full length is valid.
    pub fn single_release(
        exports: impl IntoIterator<Item = CapabilityExport<F>>,
    ) -> Result<Self, TableError> {
        Self::builder().release(exports).build()
    }

    /// Number of exports in the current release.
    pub fn current_count(&self) -> usize {
        self.exports.len()
    }

    pub fn is_valid_count(&self, count: usize) -> bool {
        self.valid_counts.contains(&count)
    }

    /// Valid export counts in ascending order.
    pub fn valid_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid_counts.iter().copied()
    }

    /// The first `count` exports, or `None` when `count` was never a
    /// published release length.
    pub fn prefix(&self, count: usize) -> Option<&[CapabilityExport<F>]> {
        if !self.is_valid_count(count) {
            return None;
        }
        self.exports.get(..count)
    }

    pub fn all(&self) -> &[CapabilityExport<F>] {
        &self.exports
    }
}

/// Collects releases in publication order.
#[derive(Debug, Clone)]
pub struct ExportTableBuilder<F> {
    releases: Vec<Vec<CapabilityExport<F>>>,
}

impl<F> Default for ExportTableBuilder<F> {
    fn default() -> Self {
        Self {
            releases: Vec::new(),
        }
    }
}

impl<F: Copy> ExportTableBuilder<F> {
    /// Append the exports added by the next release.
    pub fn release(mut self, exports: impl IntoIterator<Item = CapabilityExport<F>>) -> Self {
        self.releases.push(exports.into_iter().collect());
        self
    }

    pub fn build(self) -> Result<ExportTable<F>, TableError> {
        let mut exports = Vec::new();
        let mut valid_counts = BTreeSet::new();
        for (release, added) in self.releases.into_iter().enumerate() {
            if added.is_empty() {
                return Err(TableError::EmptyRelease { release });
            }
            exports.extend(added);
            valid_counts.insert(exports.len());
        }
        if exports.is_empty() {
            return Err(TableError::EmptyTable);
        }
        Ok(ExportTable {
            exports: exports.into_boxed_slice(),
            valid_counts,
        })
    }
}

/// Client-owned buffer that receives a granted prefix of the export table.
///
/// An empty slot means no capabilities were granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySlot<F> {
    functions: Vec<F>,
}

impl<F> Default for CapabilitySlot<F> {
    fn default() -> Self {
        Self {
            functions: Vec::new(),
        }
    }
}

impl<F: Copy> CapabilitySlot<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_granted(&self) -> bool {
        !self.functions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Function at a calling-convention index.
    pub fn get(&self, index: usize) -> Option<F> {
        self.functions.get(index).copied()
    }

    pub fn functions(&self) -> &[F] {
        &self.functions
    }

    pub(crate) fn fill(&mut self, exports: &[CapabilityExport<F>]) {
        self.functions.clear();
        self.functions
            .extend(exports.iter().map(CapabilityExport::function));
    }

    pub(crate) fn clear(&mut self) {
        self.functions.clear();
    }
}

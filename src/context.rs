//! Per-file decoding state carried across frames.

use crate::legacy::LegacyState;
use crate::names::NameTable;

/// Everything a frame decode needs that isn't local to that one frame:
/// the resolved format version, the name table, and — only exercised
/// for legacy-open files — the running legacy-sums state.
pub(crate) struct FileContext {
    pub(crate) file_version: i32,
    pub(crate) legacy_open: bool,
    pub(crate) names: NameTable,
    pub(crate) legacy: LegacyState,
}

impl FileContext {
    pub(crate) fn new(names: NameTable) -> Self {
        Self {
            file_version: names.file_version,
            legacy_open: names.legacy_open,
            names,
            legacy: LegacyState::new(),
        }
    }

    pub(crate) fn nre(&self) -> i32 {
        self.names.terms.len() as i32
    }
}

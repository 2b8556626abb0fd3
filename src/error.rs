//! Error types for the line-info plugin.
//!
//! Every failure during `init()` is converted to a skip-load signal by the
//! lifecycle controller; nothing in this crate propagates a panic into the
//! host. Handlers return errors to the host binding, which logs them.

use crate::host::HostError;
use crate::symbols::SymbolError;
use thiserror::Error;

/// Plugin-level errors covering environment, symbol-resolution, registration,
/// and per-handler resolution failures.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("no input file is loaded in the host")]
    NoInputFile,

    #[error("unable to load symbols: {0}")]
    Symbols(#[from] SymbolError),

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("no symbol session is open")]
    NoSession,

    #[error("no selection is active")]
    NoSelection,

    #[error("invalid selection range: end {end:#x} <= start {start:#x}")]
    InvalidSelection { start: u64, end: u64 },

    #[error("no function at address {0:#x}")]
    FunctionNotFound(u64),

    #[error("no cursor position available")]
    NoCursor,
}

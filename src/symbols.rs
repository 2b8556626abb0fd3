//! Boundary with the annotation core.
//!
//! PDB/DIA parsing, address-to-line resolution, and comment synthesis live in
//! the external annotation core; this crate only opens a session and invokes
//! it. A production build binds [`LineInfoCore`] to that core, tests bind it
//! to the recording mock in `host::mock`.

use crate::host::{Address, FunctionRef};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by the annotation core.
#[derive(Debug, Error)]
pub enum SymbolError {
    /// No debug-symbol file matching the binary was found on any search path.
    #[error("no matching debug symbols for {binary}: {reason}")]
    NoMatchingSymbols { binary: String, reason: String },

    /// The session exists but an annotation call failed.
    #[error("annotation failed: {0}")]
    AnnotationFailed(String),
}

/// An open debug-symbol session bound to one loaded binary.
///
/// At most one instance exists per plugin lifetime; it is opened during
/// `init()` and dropped at `term()`. All calls are synchronous and read-only
/// with respect to the session.
pub trait SymbolSession: Send + Sync {
    /// Annotate every line in `[start, start + length)`.
    fn annotate_range(&self, start: Address, length: u64) -> Result<(), SymbolError>;

    /// Annotate one function.
    fn annotate_function(&self, func: &FunctionRef) -> Result<(), SymbolError>;

    /// Annotate the whole binary.
    fn annotate_all(&self) -> Result<(), SymbolError>;
}

/// Factory for symbol sessions.
pub trait LineInfoCore: Send + Sync {
    /// Open a session for `binary_path`, probing `search_paths` in order for
    /// a matching debug-symbol file.
    fn open_session(
        &self,
        binary_path: &Path,
        search_paths: &[PathBuf],
    ) -> Result<std::sync::Arc<dyn SymbolSession>, SymbolError>;
}

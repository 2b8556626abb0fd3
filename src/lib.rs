//! Line-info annotation plugin glue for a disassembler host.
//!
//! This library wires host UI events (menus, hotkeys, popups) to an external
//! annotation core that reads debug symbols (PDB) and writes source/line
//! comments into the disassembly listing. The hard work — symbol parsing,
//! address-to-line resolution, comment formatting — lives behind the
//! [`symbols::LineInfoCore`] boundary; this crate is the host-facing glue.
//!
//! # Architecture
//!
//! The host dispatches one UI event at a time; everything here runs to
//! completion synchronously on the host's UI thread.
//!
//! - **[`plugin::LineInfoPlugin`]**: the lifecycle controller the host
//!   instantiates once per process. Opens the symbol session, installs the
//!   popup hook, registers actions on `init`, and reverses all of it on
//!   `term`. Every init failure is logged and converted to a skip-load
//!   signal; nothing panics into the host.
//!
//! - **[`hooks::PopupHook`]**: observes popup construction in the
//!   disassembly and functions-list views and attaches at most one entry,
//!   recomputing selection/cursor state fresh on every event.
//!
//! - **[`actions`]**: the four handler variants. Range-annotate and
//!   function-annotate are offered dynamically from the popup hook; the
//!   chosen-functions and whole-binary actions live in the host's action
//!   namespace with a menu path and hotkey.
//!
//! - **[`host`]** / **[`symbols`]**: trait boundaries for the two external
//!   collaborators. Production builds bind them to the disassembler SDK and
//!   the annotation core; tests bind them to recording mocks.
//!
//! # Degraded mode
//!
//! Hosts predating the action-registration API load in a reduced feature
//! set: no popup or menu integration, and the generic run entry point
//! triggers whole-binary annotation directly.

pub mod actions;
pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod plugin;
pub mod symbols;

pub use actions::{ActionHandler, Handled, UpdateState};
pub use config::PluginConfig;
pub use error::PluginError;
pub use hooks::PopupHook;
pub use host::{
    ActionContext, ActionDesc, Address, FunctionRef, Host, HostCapabilities, PopupMenu,
    SelectionRange, UiHook, ViewKind,
};
pub use plugin::{plugin, plugin_entry, FeatureMode, LineInfoPlugin, LoadStatus, PLUGIN_INFO};
pub use symbols::{LineInfoCore, SymbolError, SymbolSession};

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static LOG_INIT: Once = Once::new();

/// Install the stderr log subscriber, filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything. The
/// host binding calls this before `plugin_entry`.
pub fn init_logging() {
    LOG_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

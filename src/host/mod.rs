//! Boundary with the host disassembler.
//!
//! The host's UI/action framework is an external collaborator: a production
//! build binds [`Host`] to the disassembler SDK, tests bind it to the
//! recording mock in [`mock`]. The plugin only ever talks to the host through
//! this surface: environment queries, selection/function queries, action
//! registration, and the popup-hook observer.

use crate::actions::ActionHandler;
use crate::error::PluginError;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[cfg(test)]
pub(crate) mod mock;

/// A linear address in the host's analysis database.
pub type Address = u64;

/// Errors raised by the host when a registration call is rejected.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("action {0:?} is already registered")]
    DuplicateAction(String),

    #[error("host rejected action {0:?}")]
    ActionRejected(String),

    #[error("failed to install UI hook")]
    HookInstallFailed,

    #[error("failed to attach action {action:?} to menu {path:?}")]
    MenuAttachFailed { path: String, action: String },
}

/// A half-open address interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    start: Address,
    end: Address,
}

impl SelectionRange {
    /// Build a range, rejecting empty or inverted intervals.
    pub fn new(start: Address, end: Address) -> Result<Self, PluginError> {
        if end > start {
            Ok(Self { start, end })
        } else {
            Err(PluginError::InvalidSelection { start, end })
        }
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }
}

/// Opaque handle to one function in the host's analysis database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRef {
    start: Address,
    end: Address,
    name: String,
}

impl FunctionRef {
    pub fn new(start: Address, end: Address, name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            name: name.into(),
        }
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `addr` falls inside the function body.
    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// Kind of view a popup is being built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewKind {
    /// The disassembly listing.
    Disassembly,
    /// The functions-list chooser.
    Functions,
    /// Any other widget; the popup hook ignores these.
    #[default]
    Other,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disassembly => "disassembly",
            Self::Functions => "functions",
            Self::Other => "other",
        }
    }
}

/// Host features probed once at plugin load.
///
/// Older hosts lack the action-registration API or the structured selection
/// object; the plugin degrades instead of scattering version checks through
/// the handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Named action registration and popup attachment are available.
    pub action_api: bool,
    /// The host exposes a structured selection object in action contexts.
    pub structured_selection: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            action_api: true,
            structured_selection: true,
        }
    }
}

/// Context the host hands to an action handler on activation or update.
///
/// Handlers are stateless and re-derive everything they need from this
/// context plus live host queries; nothing is captured at popup time.
#[derive(Clone, Default)]
pub struct ActionContext {
    /// The view the action was triggered from.
    pub view: ViewKind,
    /// Structured selection, if the host supports it and one is active.
    pub cur_sel: Option<SelectionRange>,
    /// Function under the cursor, if any.
    pub cur_func: Option<FunctionRef>,
    /// Selected row indices in a chooser view. 1-based, per host convention.
    pub chooser_selection: Vec<usize>,
}

/// Where a registered action is inserted into a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the host's default entries.
    BeforeDefaults,
    /// After the host's default entries.
    AfterDefaults,
}

/// One entry attached to a popup under construction.
pub enum PopupEntry {
    /// Reference to an action registered in the host's action namespace.
    Action {
        name: &'static str,
        position: InsertPosition,
    },
    /// One-off entry with an inline handler; occupies no action name.
    Dynamic {
        label: String,
        handler: Arc<dyn ActionHandler>,
    },
}

/// A popup menu under construction, passed to the UI hook by the host.
#[derive(Default)]
pub struct PopupMenu {
    entries: Vec<PopupEntry>,
}

impl PopupMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a registered action by name.
    pub fn attach_action(&mut self, name: &'static str, position: InsertPosition) {
        self.entries.push(PopupEntry::Action { name, position });
    }

    /// Attach a one-off dynamic entry.
    pub fn attach_dynamic(&mut self, label: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.entries.push(PopupEntry::Dynamic {
            label: label.into(),
            handler,
        });
    }

    pub fn entries(&self) -> &[PopupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels of dynamic entries, in attachment order.
    pub fn dynamic_labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                PopupEntry::Dynamic { label, .. } => Some(label.as_str()),
                PopupEntry::Action { .. } => None,
            })
            .collect()
    }

    /// Names of registered actions attached to this popup.
    pub fn action_names(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                PopupEntry::Action { name, .. } => Some(*name),
                PopupEntry::Dynamic { .. } => None,
            })
            .collect()
    }
}

/// Descriptor for a named, host-visible action.
#[derive(Debug, Clone, Copy)]
pub struct ActionDesc {
    /// Unique name in the host's action namespace.
    pub name: &'static str,
    /// Label shown in menus and popups.
    pub label: &'static str,
    /// Optional hotkey, host syntax (e.g. "Alt-A").
    pub hotkey: Option<&'static str>,
    /// Optional menu path to attach the action under.
    pub menu_path: Option<&'static str>,
}

/// Observer invoked while the host builds a context popup.
pub trait UiHook: Send + Sync {
    /// Called after the host populated the default entries for `view`.
    fn finish_populating_popup(&self, host: &dyn Host, view: ViewKind, popup: &mut PopupMenu);
}

/// The host disassembler surface the plugin is written against.
///
/// The host guarantees serialized, single-threaded event delivery; `Send +
/// Sync` bounds exist only so handles can live in process-wide statics.
pub trait Host: Send + Sync {
    /// Block until the host's auto-analysis has settled.
    fn auto_wait(&self);

    /// Path of the currently loaded input binary, if any.
    fn input_file_path(&self) -> Option<PathBuf>;

    /// Host-configured symbol search path (e.g. `_NT_SYMBOL_PATH`), if set.
    fn configured_symbol_search_path(&self) -> Option<String>;

    /// Feature probe, performed once at plugin load.
    fn capabilities(&self) -> HostCapabilities;

    /// Address under the screen cursor, if a listing view is focused.
    fn screen_address(&self) -> Option<Address>;

    /// Structured selection in the active listing view.
    fn current_selection(&self) -> Option<SelectionRange>;

    /// Flat selection query, the fallback on hosts without structured
    /// selection objects. Returns raw `(start, end)` bounds.
    fn read_selection(&self) -> Option<(Address, Address)>;

    /// Function containing `addr`, if one is defined there.
    fn function_at(&self, addr: Address) -> Option<FunctionRef>;

    /// Function at 0-based `index` in the host's function table.
    fn function_by_index(&self, index: usize) -> Option<FunctionRef>;

    /// Register a named action. Names must be unique for the plugin's
    /// lifetime; re-registering a live name fails.
    fn register_action(
        &self,
        desc: &ActionDesc,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), HostError>;

    /// Unregister a named action. Returns false (without raising) when the
    /// name was not registered.
    fn unregister_action(&self, name: &str) -> bool;

    /// Attach a registered action under a menu path.
    fn attach_action_to_menu(&self, path: &str, name: &str) -> Result<(), HostError>;

    /// Install the popup observer. At most one per plugin.
    fn install_popup_hook(&self, hook: Arc<dyn UiHook>) -> Result<(), HostError>;

    /// Remove the popup observer. Returns false when none was installed.
    fn remove_popup_hook(&self) -> bool;
}

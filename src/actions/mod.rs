//! Action handlers and the static action registry.
//!
//! Four handler variants share one capability set ({activate, update}):
//! range-annotate and single-function-annotate are offered dynamically by the
//! popup hook, chosen-functions and whole-binary are registered in the host's
//! action namespace at plugin load. Handlers are stateless apart from the
//! shared symbol session and re-derive all inputs from the action context.

mod handlers;

pub use handlers::{
    AnnotateChosenFunctions, AnnotateFunction, AnnotateSelection, AnnotateWholeBinary,
};

use crate::error::PluginError;
use crate::host::{ActionContext, ActionDesc, Host};

/// Name of the functions-list popup action.
pub const ACTION_ANNOTATE_FUNCS: &str = "lineinfo:annotate_funcs";
/// Name of the whole-binary menu action.
pub const ACTION_ANNOTATE_ALL: &str = "lineinfo:annotate_all";

/// Label of the dynamic range-annotate popup entry.
pub const LABEL_ANNOTATE_SELECTION: &str = "Annotate selection with line info";
/// Label of the dynamic function-annotate popup entry.
pub const LABEL_ANNOTATE_FUNCTION: &str = "Annotate function with line info";

/// Actions registered in the host's action namespace at plugin load.
///
/// Dynamic popup entries are not listed here; they occupy no action name.
pub static REGISTERED_ACTIONS: &[ActionDesc] = &[
    ActionDesc {
        name: ACTION_ANNOTATE_FUNCS,
        label: "Annotate function(s) with line info",
        hotkey: None,
        menu_path: None,
    },
    ActionDesc {
        name: ACTION_ANNOTATE_ALL,
        label: "Annotate whole binary with line info",
        hotkey: Some("Alt-A"),
        menu_path: Some("Edit/Annotate lineinfo"),
    },
];

/// Look up a registered action descriptor by name.
pub fn action_desc(name: &str) -> Option<&'static ActionDesc> {
    REGISTERED_ACTIONS.iter().find(|desc| desc.name == name)
}

/// Whether an activation consumed the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Consumed,
    Ignored,
}

/// Enablement state reported by `update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Enabled everywhere.
    Enable,
    /// Disabled in the current context.
    Disable,
    /// Enabled only while the originating view is focused.
    EnableForView,
}

/// One host-dispatchable command.
///
/// The host calls `update` to decide enablement while building menus and
/// `activate` when the user triggers the action.
pub trait ActionHandler: Send + Sync {
    fn activate(&self, host: &dyn Host, ctx: &ActionContext) -> Result<Handled, PluginError>;

    fn update(&self, _ctx: &ActionContext) -> UpdateState {
        UpdateState::Enable
    }
}

//! Plugin lifecycle controller.
//!
//! The host instantiates exactly one plugin object and drives it through
//! `init`/`run`/`term`. `init` opens the symbol session, installs the popup
//! hook, and registers the static actions; any failure rolls back whatever
//! was already installed and signals skip-load instead of propagating into
//! the host. Symbol loading is attempted exactly once per host session.

use crate::actions::{
    ActionHandler, AnnotateChosenFunctions, AnnotateWholeBinary, ACTION_ANNOTATE_ALL,
    ACTION_ANNOTATE_FUNCS, REGISTERED_ACTIONS,
};
use crate::config::PluginConfig;
use crate::error::PluginError;
use crate::hooks::PopupHook;
use crate::host::Host;
use crate::symbols::{LineInfoCore, SymbolSession};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info, warn};

/// Plugin name, used as the prefix of the host action namespace.
pub const PLUGIN_NAME: &str = "lineinfo";
/// One-line description shown by the host's plugin list.
pub const PLUGIN_COMMENT: &str =
    "Annotate the listing with source file and line numbers from PDB debug info";
/// Help text shown by the host's plugin list.
pub const PLUGIN_HELP: &str =
    "Set LINEINFO_SYMBOL_PATH for extra symbol search paths; see the popup and Edit menus";

/// Identity the host binding surfaces for this plugin.
#[derive(Debug, Clone, Copy)]
pub struct PluginInfo {
    pub name: &'static str,
    pub comment: &'static str,
    pub help: &'static str,
    /// Plugin-level hotkey. None: the whole-binary action carries its own
    /// hotkey, so the generic run entry point stays unbound.
    pub wanted_hotkey: Option<&'static str>,
}

/// Descriptor for this plugin.
pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    name: PLUGIN_NAME,
    comment: PLUGIN_COMMENT,
    help: PLUGIN_HELP,
    wanted_hotkey: None,
};

/// Signal returned from `init` to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Keep the plugin loaded.
    Keep,
    /// Skip loading; the host continues without this plugin.
    Skip,
}

/// Feature set the plugin settled on at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureMode {
    /// Popup hook plus registered actions.
    Full,
    /// Host lacks the action-registration API; only the generic run entry
    /// point is available and triggers whole-binary annotation.
    LegacyRunOnly,
}

/// Owns the symbol session and the UI hook; registers and unregisters
/// actions on load/unload.
pub struct LineInfoPlugin {
    host: Arc<dyn Host>,
    core: Arc<dyn LineInfoCore>,
    config: PluginConfig,
    session: Option<Arc<dyn SymbolSession>>,
    mode: FeatureMode,
    hook_installed: bool,
    registered: Vec<&'static str>,
}

impl LineInfoPlugin {
    /// Build a plugin with config loaded from the process environment.
    pub fn new(host: Arc<dyn Host>, core: Arc<dyn LineInfoCore>) -> Self {
        Self::with_config(host, core, PluginConfig::load())
    }

    pub fn with_config(
        host: Arc<dyn Host>,
        core: Arc<dyn LineInfoCore>,
        config: PluginConfig,
    ) -> Self {
        Self {
            host,
            core,
            config,
            session: None,
            mode: FeatureMode::Full,
            hook_installed: false,
            registered: Vec::new(),
        }
    }

    pub fn mode(&self) -> FeatureMode {
        self.mode
    }

    /// Host load callback. Never panics into the host: every failure is
    /// logged once and converted to [`LoadStatus::Skip`] after rolling back
    /// anything already installed.
    pub fn init(&mut self) -> LoadStatus {
        match self.try_init() {
            Ok(mode) => {
                self.mode = mode;
                info!(plugin = PLUGIN_NAME, mode = ?mode, "loaded");
                LoadStatus::Keep
            }
            Err(err) => {
                warn!(plugin = PLUGIN_NAME, %err, "skipping load");
                self.unwind();
                LoadStatus::Skip
            }
        }
    }

    fn try_init(&mut self) -> Result<FeatureMode, PluginError> {
        self.host.auto_wait();

        let binary = self
            .host
            .input_file_path()
            .ok_or(PluginError::NoInputFile)?;

        let host_symbol_path = self.host.configured_symbol_search_path();
        let search_paths = self
            .config
            .merged_search_paths(host_symbol_path.as_deref());
        debug!(binary = %binary.display(), ?search_paths, "opening symbol session");

        let session = self.core.open_session(&binary, &search_paths)?;
        self.session = Some(session.clone());

        if !self.host.capabilities().action_api {
            warn!(
                plugin = PLUGIN_NAME,
                "host action API unavailable, falling back to run-only mode"
            );
            return Ok(FeatureMode::LegacyRunOnly);
        }

        self.host
            .install_popup_hook(Arc::new(PopupHook::new(session.clone())))?;
        self.hook_installed = true;

        for desc in REGISTERED_ACTIONS {
            let handler: Arc<dyn ActionHandler> = match desc.name {
                ACTION_ANNOTATE_FUNCS => Arc::new(AnnotateChosenFunctions::new(session.clone())),
                ACTION_ANNOTATE_ALL => Arc::new(AnnotateWholeBinary::new(session.clone())),
                other => {
                    warn!(action = other, "registered action without a handler");
                    continue;
                }
            };
            self.host.register_action(desc, handler)?;
            self.registered.push(desc.name);
            if let Some(menu_path) = desc.menu_path {
                self.host.attach_action_to_menu(menu_path, desc.name)?;
            }
        }

        Ok(FeatureMode::Full)
    }

    /// Host manual-invocation callback. In full mode whole-binary annotation
    /// lives on its menu action, so this is a no-op; in legacy mode it is the
    /// only trigger and annotates the whole binary directly.
    pub fn run(&mut self, arg: usize) {
        match self.mode {
            FeatureMode::Full => {
                debug!(arg, "run ignored; use the annotate-all menu action");
            }
            FeatureMode::LegacyRunOnly => match &self.session {
                Some(session) => {
                    if let Err(err) = session.annotate_all() {
                        warn!(plugin = PLUGIN_NAME, %err, "whole-binary annotation failed");
                    }
                }
                None => warn!(plugin = PLUGIN_NAME, "run called with no symbol session"),
            },
        }
    }

    /// Host unload callback. Idempotent: a second call finds nothing left to
    /// remove and logs instead of raising.
    pub fn term(&mut self) {
        info!(plugin = PLUGIN_NAME, "unloading");
        self.unwind();
    }

    /// Reverse everything `init` installed, in reverse order.
    fn unwind(&mut self) {
        for name in self.registered.drain(..).rev() {
            if !self.host.unregister_action(name) {
                warn!(action = name, "action was not registered");
            }
        }
        if self.hook_installed {
            if !self.host.remove_popup_hook() {
                warn!("popup hook was not installed");
            }
            self.hook_installed = false;
        }
        self.session = None;
        self.mode = FeatureMode::Full;
    }
}

static PLUGIN: OnceLock<Mutex<LineInfoPlugin>> = OnceLock::new();

/// Process-wide plugin entry point.
///
/// The host instantiates exactly one plugin object per process; later
/// callbacks reach it through [`plugin`]. Repeated calls return the instance
/// created first.
pub fn plugin_entry(
    host: Arc<dyn Host>,
    core: Arc<dyn LineInfoCore>,
) -> &'static Mutex<LineInfoPlugin> {
    PLUGIN.get_or_init(|| Mutex::new(LineInfoPlugin::new(host, core)))
}

/// The singleton instance, if `plugin_entry` has run.
pub fn plugin() -> Option<&'static Mutex<LineInfoPlugin>> {
    PLUGIN.get()
}

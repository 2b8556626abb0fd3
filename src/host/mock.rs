//! Recording mocks for the host and the annotation core.

use super::{
    ActionDesc, Address, FunctionRef, Host, HostCapabilities, HostError, PopupMenu,
    SelectionRange, UiHook, ViewKind,
};
use crate::actions::{ActionHandler, Handled};
use crate::error::PluginError;
use crate::host::ActionContext;
use crate::symbols::{LineInfoCore, SymbolError, SymbolSession};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory host double. Registration calls are recorded so tests can
/// assert on the action namespace and hook state.
pub(crate) struct MockHost {
    input_file: Option<PathBuf>,
    symbol_search_path: Option<String>,
    capabilities: HostCapabilities,
    functions: Vec<FunctionRef>,
    fail_register: HashSet<&'static str>,
    fail_hook: bool,
    selection: Mutex<Option<SelectionRange>>,
    flat_selection: Mutex<Option<(Address, Address)>>,
    cursor: Mutex<Option<Address>>,
    registered: Mutex<HashMap<String, Arc<dyn ActionHandler>>>,
    menu_attachments: Mutex<Vec<(String, String)>>,
    hook: Mutex<Option<Arc<dyn UiHook>>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            input_file: Some(PathBuf::from("/bin/target.exe")),
            symbol_search_path: None,
            capabilities: HostCapabilities::default(),
            functions: Vec::new(),
            fail_register: HashSet::new(),
            fail_hook: false,
            selection: Mutex::new(None),
            flat_selection: Mutex::new(None),
            cursor: Mutex::new(None),
            registered: Mutex::new(HashMap::new()),
            menu_attachments: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
        }
    }

    pub fn with_input_file(mut self, path: Option<&str>) -> Self {
        self.input_file = path.map(PathBuf::from);
        self
    }

    pub fn with_symbol_search_path(mut self, path: &str) -> Self {
        self.symbol_search_path = Some(path.to_string());
        self
    }

    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Function table; index order doubles as the chooser's 0-based order.
    pub fn with_functions(mut self, functions: Vec<FunctionRef>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_fail_register(mut self, name: &'static str) -> Self {
        self.fail_register.insert(name);
        self
    }

    pub fn with_fail_hook(mut self) -> Self {
        self.fail_hook = true;
        self
    }

    pub fn set_selection(&self, sel: Option<SelectionRange>) {
        *lock(&self.selection) = sel;
    }

    pub fn set_flat_selection(&self, sel: Option<(Address, Address)>) {
        *lock(&self.flat_selection) = sel;
    }

    pub fn set_cursor(&self, cursor: Option<Address>) {
        *lock(&self.cursor) = cursor;
    }

    /// Names currently registered, sorted.
    pub fn registered_actions(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(&self.registered).keys().cloned().collect();
        names.sort();
        names
    }

    pub fn hook_installed(&self) -> bool {
        lock(&self.hook).is_some()
    }

    pub fn menu_attachments(&self) -> Vec<(String, String)> {
        lock(&self.menu_attachments).clone()
    }

    /// Drive the installed hook as the host would when building a popup.
    pub fn trigger_popup(&self, view: ViewKind) -> PopupMenu {
        let mut popup = PopupMenu::new();
        let hook = lock(&self.hook).clone();
        if let Some(hook) = hook {
            hook.finish_populating_popup(self, view, &mut popup);
        }
        popup
    }

    /// Activate a registered action as the host would.
    pub fn activate_registered(
        &self,
        name: &str,
        ctx: &ActionContext,
    ) -> Result<Handled, PluginError> {
        let handler = lock(&self.registered)
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("action {name:?} is not registered"));
        handler.activate(self, ctx)
    }
}

impl Host for MockHost {
    fn auto_wait(&self) {}

    fn input_file_path(&self) -> Option<PathBuf> {
        self.input_file.clone()
    }

    fn configured_symbol_search_path(&self) -> Option<String> {
        self.symbol_search_path.clone()
    }

    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn screen_address(&self) -> Option<Address> {
        *lock(&self.cursor)
    }

    fn current_selection(&self) -> Option<SelectionRange> {
        *lock(&self.selection)
    }

    fn read_selection(&self) -> Option<(Address, Address)> {
        *lock(&self.flat_selection)
    }

    fn function_at(&self, addr: Address) -> Option<FunctionRef> {
        self.functions.iter().find(|f| f.contains(addr)).cloned()
    }

    fn function_by_index(&self, index: usize) -> Option<FunctionRef> {
        self.functions.get(index).cloned()
    }

    fn register_action(
        &self,
        desc: &ActionDesc,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), HostError> {
        if self.fail_register.contains(desc.name) {
            return Err(HostError::ActionRejected(desc.name.to_string()));
        }
        let mut registered = lock(&self.registered);
        if registered.contains_key(desc.name) {
            return Err(HostError::DuplicateAction(desc.name.to_string()));
        }
        registered.insert(desc.name.to_string(), handler);
        Ok(())
    }

    fn unregister_action(&self, name: &str) -> bool {
        lock(&self.registered).remove(name).is_some()
    }

    fn attach_action_to_menu(&self, path: &str, name: &str) -> Result<(), HostError> {
        if !lock(&self.registered).contains_key(name) {
            return Err(HostError::MenuAttachFailed {
                path: path.to_string(),
                action: name.to_string(),
            });
        }
        lock(&self.menu_attachments).push((path.to_string(), name.to_string()));
        Ok(())
    }

    fn install_popup_hook(&self, hook: Arc<dyn UiHook>) -> Result<(), HostError> {
        if self.fail_hook {
            return Err(HostError::HookInstallFailed);
        }
        *lock(&self.hook) = Some(hook);
        Ok(())
    }

    fn remove_popup_hook(&self) -> bool {
        lock(&self.hook).take().is_some()
    }
}

/// One call recorded against the mock symbol session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CoreCall {
    Range { start: Address, length: u64 },
    Function { start: Address },
    WholeBinary,
}

/// Recording session double.
#[derive(Default)]
pub(crate) struct MockSession {
    calls: Mutex<Vec<CoreCall>>,
}

impl MockSession {
    pub fn calls(&self) -> Vec<CoreCall> {
        lock(&self.calls).clone()
    }
}

impl SymbolSession for MockSession {
    fn annotate_range(&self, start: Address, length: u64) -> Result<(), SymbolError> {
        lock(&self.calls).push(CoreCall::Range { start, length });
        Ok(())
    }

    fn annotate_function(&self, func: &FunctionRef) -> Result<(), SymbolError> {
        lock(&self.calls).push(CoreCall::Function {
            start: func.start(),
        });
        Ok(())
    }

    fn annotate_all(&self) -> Result<(), SymbolError> {
        lock(&self.calls).push(CoreCall::WholeBinary);
        Ok(())
    }
}

/// Core double. Hands out one shared [`MockSession`] so tests can observe
/// calls made through sessions the plugin opened.
pub(crate) struct MockCore {
    fail_open: Option<String>,
    session: Arc<MockSession>,
    open_calls: Mutex<Vec<(PathBuf, Vec<PathBuf>)>>,
}

impl MockCore {
    pub fn new() -> Self {
        Self {
            fail_open: None,
            session: Arc::new(MockSession::default()),
            open_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_open: Some(reason.to_string()),
            ..Self::new()
        }
    }

    pub fn session(&self) -> Arc<MockSession> {
        self.session.clone()
    }

    pub fn open_calls(&self) -> Vec<(PathBuf, Vec<PathBuf>)> {
        lock(&self.open_calls).clone()
    }
}

impl LineInfoCore for MockCore {
    fn open_session(
        &self,
        binary_path: &Path,
        search_paths: &[PathBuf],
    ) -> Result<Arc<dyn SymbolSession>, SymbolError> {
        if let Some(reason) = &self.fail_open {
            return Err(SymbolError::NoMatchingSymbols {
                binary: binary_path.display().to_string(),
                reason: reason.clone(),
            });
        }
        lock(&self.open_calls).push((binary_path.to_path_buf(), search_paths.to_vec()));
        Ok(self.session.clone())
    }
}

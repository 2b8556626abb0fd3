//! The four annotation handler variants.

use super::{ActionHandler, Handled, UpdateState};
use crate::error::PluginError;
use crate::host::{ActionContext, Host, SelectionRange, ViewKind};
use crate::symbols::SymbolSession;
use std::sync::Arc;
use tracing::{debug, warn};

/// Annotate the current selection. Offered dynamically in the disassembly
/// view while a selection is active.
pub struct AnnotateSelection {
    session: Arc<dyn SymbolSession>,
}

impl AnnotateSelection {
    pub fn new(session: Arc<dyn SymbolSession>) -> Self {
        Self { session }
    }
}

impl ActionHandler for AnnotateSelection {
    fn activate(&self, host: &dyn Host, ctx: &ActionContext) -> Result<Handled, PluginError> {
        // Structured selection from the context when the host provides one,
        // otherwise the flat selection query.
        let range = match ctx.cur_sel {
            Some(sel) => sel,
            None => {
                let (start, end) = host.read_selection().ok_or(PluginError::NoSelection)?;
                SelectionRange::new(start, end)?
            }
        };
        debug!(start = range.start(), length = range.len(), "annotating selection");
        self.session.annotate_range(range.start(), range.len())?;
        Ok(Handled::Consumed)
    }
}

/// Annotate the function under the cursor. Offered dynamically in the
/// disassembly view while no selection is active.
pub struct AnnotateFunction {
    session: Arc<dyn SymbolSession>,
}

impl AnnotateFunction {
    pub fn new(session: Arc<dyn SymbolSession>) -> Self {
        Self { session }
    }
}

impl ActionHandler for AnnotateFunction {
    fn activate(&self, host: &dyn Host, ctx: &ActionContext) -> Result<Handled, PluginError> {
        let func = match ctx.cur_func.clone() {
            Some(func) => func,
            None => {
                let cursor = host.screen_address().ok_or(PluginError::NoCursor)?;
                host.function_at(cursor)
                    .ok_or(PluginError::FunctionNotFound(cursor))?
            }
        };
        debug!(func = func.name(), "annotating function");
        self.session.annotate_function(&func)?;
        Ok(Handled::Consumed)
    }
}

/// Annotate every function selected in the functions-list chooser.
/// Registered statically; enabled only while that view is focused.
pub struct AnnotateChosenFunctions {
    session: Arc<dyn SymbolSession>,
}

impl AnnotateChosenFunctions {
    pub fn new(session: Arc<dyn SymbolSession>) -> Self {
        Self { session }
    }
}

impl ActionHandler for AnnotateChosenFunctions {
    fn activate(&self, host: &dyn Host, ctx: &ActionContext) -> Result<Handled, PluginError> {
        for &row in &ctx.chooser_selection {
            // Chooser rows are 1-based; the function table is 0-based.
            let Some(index) = row.checked_sub(1) else {
                warn!(row, "chooser row is not 1-based, skipping");
                continue;
            };
            match host.function_by_index(index) {
                Some(func) => {
                    debug!(func = func.name(), index, "annotating chosen function");
                    self.session.annotate_function(&func)?;
                }
                None => warn!(index, "no function at chooser index, skipping"),
            }
        }
        Ok(Handled::Consumed)
    }

    fn update(&self, ctx: &ActionContext) -> UpdateState {
        if ctx.view == ViewKind::Functions {
            UpdateState::EnableForView
        } else {
            UpdateState::Disable
        }
    }
}

/// Annotate the whole binary. Registered statically with a menu path and
/// hotkey.
pub struct AnnotateWholeBinary {
    session: Arc<dyn SymbolSession>,
}

impl AnnotateWholeBinary {
    pub fn new(session: Arc<dyn SymbolSession>) -> Self {
        Self { session }
    }
}

impl ActionHandler for AnnotateWholeBinary {
    fn activate(&self, _host: &dyn Host, _ctx: &ActionContext) -> Result<Handled, PluginError> {
        debug!("annotating whole binary");
        self.session.annotate_all()?;
        Ok(Handled::Consumed)
    }
}

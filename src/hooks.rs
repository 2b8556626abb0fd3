//! Popup-population hook.
//!
//! Stateless between invocations: every popup event re-derives the selection
//! and cursor state from live host queries, then attaches at most one entry.

use crate::actions::{
    AnnotateFunction, AnnotateSelection, ACTION_ANNOTATE_FUNCS, LABEL_ANNOTATE_FUNCTION,
    LABEL_ANNOTATE_SELECTION,
};
use crate::host::{Host, InsertPosition, PopupMenu, SelectionRange, UiHook, ViewKind};
use crate::symbols::SymbolSession;
use std::sync::Arc;
use tracing::debug;

/// Observes popup construction in the disassembly and functions-list views.
pub struct PopupHook {
    session: Arc<dyn SymbolSession>,
}

impl PopupHook {
    pub fn new(session: Arc<dyn SymbolSession>) -> Self {
        Self { session }
    }

    /// Current selection, preferring the structured query and falling back to
    /// the flat one on older hosts.
    fn active_selection(&self, host: &dyn Host) -> Option<SelectionRange> {
        if host.capabilities().structured_selection {
            if let Some(sel) = host.current_selection() {
                return Some(sel);
            }
        }
        host.read_selection()
            .and_then(|(start, end)| SelectionRange::new(start, end).ok())
    }
}

impl UiHook for PopupHook {
    fn finish_populating_popup(&self, host: &dyn Host, view: ViewKind, popup: &mut PopupMenu) {
        match view {
            ViewKind::Disassembly => {
                // Selection and function entries are mutually exclusive: a
                // non-empty selection wins, the function entry applies only
                // with no selection and a function under the cursor.
                if self.active_selection(host).is_some() {
                    popup.attach_dynamic(
                        LABEL_ANNOTATE_SELECTION,
                        Arc::new(AnnotateSelection::new(self.session.clone())),
                    );
                } else if let Some(func) = host
                    .screen_address()
                    .and_then(|cursor| host.function_at(cursor))
                {
                    debug!(func = func.name(), "offering function annotation");
                    popup.attach_dynamic(
                        LABEL_ANNOTATE_FUNCTION,
                        Arc::new(AnnotateFunction::new(self.session.clone())),
                    );
                }
            }
            ViewKind::Functions => {
                popup.attach_action(ACTION_ANNOTATE_FUNCS, InsertPosition::BeforeDefaults);
            }
            ViewKind::Other => {}
        }
    }
}

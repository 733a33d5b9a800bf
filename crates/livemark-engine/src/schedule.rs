//! Decides whether a batch of host changes needs a rebuild.

use std::fmt;

use crate::decorate::Mode;

/// Classes of change reported by the host in one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeSet {
    pub doc_changed: bool,
    pub viewport_changed: bool,
    pub selection_set: bool,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        !(self.doc_changed || self.viewport_changed || self.selection_set)
    }
}

/// Why a rebuild ran, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    Initial,
    ModeSwitch,
    /// Open modifier or link scan scope changed.
    Settings,
    Document,
    Viewport,
    Selection,
}

impl fmt::Display for RebuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RebuildReason::Initial => "initial",
            RebuildReason::ModeSwitch => "mode switch",
            RebuildReason::Settings => "settings change",
            RebuildReason::Document => "document change",
            RebuildReason::Viewport => "viewport change",
            RebuildReason::Selection => "selection change",
        };
        f.write_str(s)
    }
}

/// Edit mode rebuilds on any change; Preview ignores selection.
pub fn rebuild_reason(mode: Mode, changes: ChangeSet) -> Option<RebuildReason> {
    if changes.doc_changed {
        return Some(RebuildReason::Document);
    }
    if changes.viewport_changed {
        return Some(RebuildReason::Viewport);
    }
    match mode {
        Mode::Edit if changes.selection_set => Some(RebuildReason::Selection),
        Mode::Edit | Mode::Preview => None,
    }
}

//! # Live Preview
//!
//! [`LivePreview`] owns the state of one editor: buffer, parsed tree, caret,
//! visible region and mode. Hosts feed it [`Change`]s; it decides whether to
//! rebuild and keeps the current [`Decorations`].
//!
//! The rebuild itself is the pure [`build_decorations`]; the instance only
//! caches its inputs and the widget pool.

use std::rc::Rc;

use log::trace;

use crate::decorate::{self, Mode, RebuildInput};
use crate::links::LinkScanScope;
use crate::navigation::{LinkActivation, NavigationBridge};
use crate::resolve::{self, DecorationSet};
use crate::schedule::{ChangeSet, RebuildReason, rebuild_reason};
use crate::span::Span;
use crate::tree::{MarkdownTreeProvider, Node, NodeTreeProvider};
use crate::widget::{
    Decorations, EventOutcome, Modifiers, OpenModifier, Widget, WidgetEvent, WidgetRenderer,
};

/// Candidates, then resolution. Same input, same set.
pub fn build_decorations(input: &RebuildInput<'_>) -> DecorationSet {
    resolve::resolve(decorate::candidates(input))
}

/// Per-instance options, usually loaded from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewSettings {
    pub mode: Mode,
    pub open_modifier: OpenModifier,
    pub link_scan: LinkScanScope,
}

/// One host-reported change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The whole new buffer.
    Text(String),
    /// New caret (selection head) offset.
    Selection(usize),
    /// New visible byte range.
    Viewport(Span),
}

pub struct LivePreview<P: NodeTreeProvider = MarkdownTreeProvider> {
    provider: P,
    text: String,
    tree: Node,
    caret: usize,
    viewport: Option<Span>,
    mode: Mode,
    link_scan: LinkScanScope,
    bridge: NavigationBridge,
    renderer: WidgetRenderer,
    decorations: Decorations,
    rebuilds: usize,
}

impl LivePreview<MarkdownTreeProvider> {
    pub fn new(text: impl Into<String>, settings: PreviewSettings) -> Self {
        Self::with_provider(MarkdownTreeProvider::new(), text, settings)
    }
}

impl<P: NodeTreeProvider> LivePreview<P> {
    pub fn with_provider(provider: P, text: impl Into<String>, settings: PreviewSettings) -> Self {
        let text = text.into();
        let tree = provider.parse(&text);
        let bridge = NavigationBridge::new();
        let renderer = WidgetRenderer::new(bridge.clone(), settings.open_modifier);
        let mut preview = Self {
            provider,
            text,
            tree,
            caret: 0,
            viewport: None,
            mode: settings.mode,
            link_scan: settings.link_scan,
            bridge,
            renderer,
            decorations: Decorations::default(),
            rebuilds: 0,
        };
        preview.rebuild(RebuildReason::Initial);
        preview
    }

    /// Applies a batch of changes. Returns `true` when decorations were rebuilt.
    pub fn apply(&mut self, changes: impl IntoIterator<Item = Change>) -> bool {
        let mut set = ChangeSet::default();
        for change in changes {
            match change {
                Change::Text(text) => {
                    if text != self.text {
                        self.text = text;
                        self.tree = self.provider.parse(&self.text);
                        self.caret = self.caret.min(self.text.len());
                        set.doc_changed = true;
                    }
                }
                Change::Selection(caret) => {
                    self.caret = caret.min(self.text.len());
                    set.selection_set = true;
                }
                Change::Viewport(span) => {
                    if self.viewport != Some(span) {
                        self.viewport = Some(span);
                        set.viewport_changed = true;
                    }
                }
            }
        }
        match rebuild_reason(self.mode, set) {
            Some(reason) => {
                self.rebuild(reason);
                true
            }
            None => false,
        }
    }

    /// Switches mode, rebuilding when it actually changes.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.rebuild(RebuildReason::ModeSwitch);
        true
    }

    pub fn set_open_modifier(&mut self, open_modifier: OpenModifier) {
        if open_modifier != self.renderer.open_modifier() {
            self.renderer.set_open_modifier(open_modifier);
            self.rebuild(RebuildReason::Settings);
        }
    }

    pub fn set_link_scan(&mut self, scope: LinkScanScope) {
        if scope != self.link_scan {
            self.link_scan = scope;
            self.rebuild(RebuildReason::Settings);
        }
    }

    /// Installs the navigation handler. Hosts call this on every re-render;
    /// existing widgets pick up the new handler.
    pub fn set_link_handler(&self, handler: impl FnMut(&LinkActivation) + 'static) {
        self.bridge.set(handler);
    }

    pub fn navigation(&self) -> &NavigationBridge {
        &self.bridge
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn widget_at(&self, offset: usize) -> Option<Rc<Widget>> {
        self.decorations.widget_at(offset).cloned()
    }

    /// Routes an event to the widget at `offset`. Without a widget the event
    /// passes through.
    pub fn dispatch(&self, offset: usize, event: &WidgetEvent) -> EventOutcome {
        match self.widget_at(offset) {
            Some(widget) => widget.handle(event),
            None => EventOutcome::PassThrough,
        }
    }

    /// Delivers a whole mouse click. Intercepted if any phase was.
    pub fn click(&self, offset: usize, modifiers: Modifiers) -> EventOutcome {
        let Some(widget) = self.widget_at(offset) else {
            return EventOutcome::PassThrough;
        };
        let mut outcome = EventOutcome::PassThrough;
        for event in WidgetEvent::click_sequence(modifiers) {
            if widget.handle(&event).intercepted() {
                outcome = EventOutcome::Intercepted;
            }
        }
        outcome
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn link_scan(&self) -> LinkScanScope {
        self.link_scan
    }

    /// Visible region, the whole buffer until the host reports a viewport.
    pub fn visible(&self) -> Span {
        self.viewport
            .map_or(Span::new(0, self.text.len()), |v| v.clamp_to(self.text.len()))
    }

    /// Number of rebuilds so far, including the initial one.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Widget elements built so far; pooled widgets are not counted again.
    pub fn widgets_built(&self) -> usize {
        self.renderer.built()
    }

    fn rebuild(&mut self, reason: RebuildReason) {
        let input = RebuildInput {
            text: &self.text,
            tree: &self.tree,
            caret: self.caret,
            mode: self.mode,
            visible: self.visible(),
            link_scan: self.link_scan,
        };
        let set = build_decorations(&input);
        self.rebuilds += 1;
        trace!(
            "rebuild #{} ({reason}, {} mode): {} decorations",
            self.rebuilds,
            self.mode,
            set.len()
        );
        self.decorations = self.renderer.render(set);
    }
}

//! # Widget Renderer
//!
//! Materialises replace-with-widget decorations as interactive inline
//! elements and decides which host events they consume.
//!
//! ## Modules
//!
//! - **`element`**: the inline element a widget renders as
//! - **`events`**: pointer and keyboard events, modifiers and outcomes
//!
//! Widgets are pooled across rebuilds by [`WidgetSpec`] equality, so an
//! unchanged link keeps its `Rc<Widget>` (and its element) from one rebuild
//! to the next.

pub mod element;
pub mod events;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub use element::InlineElement;
pub use events::{EventOutcome, Key, Modifiers, OpenModifier, Phase, PointerKind, WidgetEvent};

use crate::decorate::{EditKind, StyleClass};
use crate::links::WikiLinkMatch;
use crate::navigation::{LinkActivation, NavigationBridge};
use crate::resolve::DecorationSet;
use crate::span::Span;

/// Content of a link widget. Equal content means an equal widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkWidget {
    pub target: String,
    pub heading: Option<String>,
    pub display_text: Option<String>,
}

impl LinkWidget {
    /// Visible text: the display text, else the target.
    pub fn label(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.target)
    }

    /// `target` or `target#heading`.
    pub fn title(&self) -> String {
        match &self.heading {
            Some(h) => format!("{}#{h}", self.target),
            None => self.target.clone(),
        }
    }

    pub fn activation(&self) -> LinkActivation {
        LinkActivation {
            target: self.target.clone(),
            heading: self.heading.clone(),
        }
    }
}

impl From<&WikiLinkMatch> for LinkWidget {
    fn from(m: &WikiLinkMatch) -> Self {
        Self {
            target: m.target.clone(),
            heading: m.heading.clone(),
            display_text: m.display_text.clone(),
        }
    }
}

impl fmt::Display for LinkWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}", self.title())?;
        if let Some(d) = &self.display_text {
            write!(f, "|{d}")?;
        }
        f.write_str("]]")
    }
}

/// Descriptor of a replacement widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetSpec {
    /// Edit-mode link chip: opens only with the open modifier held.
    EditLink(LinkWidget),
    /// Preview-mode link: opens on a plain click.
    PreviewLink(LinkWidget),
    HorizontalRule,
}

impl WidgetSpec {
    pub fn link(&self) -> Option<&LinkWidget> {
        match self {
            WidgetSpec::EditLink(l) | WidgetSpec::PreviewLink(l) => Some(l),
            WidgetSpec::HorizontalRule => None,
        }
    }
}

impl fmt::Display for WidgetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetSpec::EditLink(l) => write!(f, "edit-link {l}"),
            WidgetSpec::PreviewLink(l) => write!(f, "preview-link {l}"),
            WidgetSpec::HorizontalRule => f.write_str("hr"),
        }
    }
}

/// A materialised widget.
#[derive(Debug)]
pub struct Widget {
    spec: WidgetSpec,
    element: InlineElement,
    bridge: NavigationBridge,
    open_modifier: OpenModifier,
}

impl Widget {
    pub fn new(spec: WidgetSpec, bridge: NavigationBridge, open_modifier: OpenModifier) -> Self {
        let element = match &spec {
            WidgetSpec::EditLink(link) => link_element("cm-wiki-link", link)
                .attr(
                    "title",
                    format!("{} ({})", link.title(), open_modifier.hint()),
                )
                .read_only(),
            WidgetSpec::PreviewLink(link) => link_element("cm-wiki-link-preview", link)
                .attr("title", link.title())
                .read_only(),
            WidgetSpec::HorizontalRule => InlineElement::new("hr", "cm-hr").read_only(),
        };
        Self {
            spec,
            element,
            bridge,
            open_modifier,
        }
    }

    pub fn spec(&self) -> &WidgetSpec {
        &self.spec
    }

    pub fn element(&self) -> &InlineElement {
        &self.element
    }

    /// Applies the interaction contract of this widget's variant.
    pub fn handle(&self, event: &WidgetEvent) -> EventOutcome {
        match &self.spec {
            WidgetSpec::EditLink(link) => self.handle_edit(link, event),
            WidgetSpec::PreviewLink(link) => self.handle_preview(link, event),
            WidgetSpec::HorizontalRule => EventOutcome::PassThrough,
        }
    }

    fn handle_edit(&self, link: &LinkWidget, event: &WidgetEvent) -> EventOutcome {
        match *event {
            WidgetEvent::Pointer {
                kind: PointerKind::Down,
                phase: Phase::Capture,
                modifiers,
            } if self.open_modifier.is_held(modifiers) => {
                self.bridge.activate(&link.activation());
                EventOutcome::Intercepted
            }
            // The click that follows a navigating pointer-down only needs swallowing.
            WidgetEvent::Pointer {
                kind: PointerKind::Click,
                phase: Phase::Capture,
                modifiers,
            } if self.open_modifier.is_held(modifiers) => EventOutcome::Intercepted,
            WidgetEvent::Key {
                key: Key::Enter,
                modifiers,
            } if self.open_modifier.is_held(modifiers) => {
                self.bridge.activate(&link.activation());
                EventOutcome::Intercepted
            }
            _ => EventOutcome::PassThrough,
        }
    }

    fn handle_preview(&self, link: &LinkWidget, event: &WidgetEvent) -> EventOutcome {
        match *event {
            WidgetEvent::Pointer {
                kind: PointerKind::Click,
                phase: Phase::Bubble,
                ..
            }
            | WidgetEvent::Key {
                key: Key::Enter | Key::Space,
                ..
            } => {
                self.bridge.activate(&link.activation());
                EventOutcome::Intercepted
            }
            _ => EventOutcome::PassThrough,
        }
    }
}

fn link_element(class: &'static str, link: &LinkWidget) -> InlineElement {
    let el = InlineElement::new("span", class)
        .text(link.label())
        .attr("data-target", link.target.clone());
    match &link.heading {
        Some(h) => el.attr("data-heading", h.clone()),
        None => el,
    }
}

/// How one resolved decoration is presented.
#[derive(Debug, Clone)]
pub enum Rendered {
    Hide,
    Style(StyleClass),
    Widget(Rc<Widget>),
}

#[derive(Debug, Clone)]
pub struct RenderedDecoration {
    pub span: Span,
    pub priority: i32,
    pub rendered: Rendered,
}

/// A resolved set with its widgets materialised.
#[derive(Debug, Clone, Default)]
pub struct Decorations {
    set: DecorationSet,
    items: Vec<RenderedDecoration>,
}

impl Decorations {
    pub fn set(&self) -> &DecorationSet {
        &self.set
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderedDecoration> {
        self.items.iter()
    }

    pub fn widgets(&self) -> impl Iterator<Item = (Span, &Rc<Widget>)> {
        self.items.iter().filter_map(|d| match &d.rendered {
            Rendered::Widget(w) => Some((d.span, w)),
            _ => None,
        })
    }

    /// Widget covering the byte at `offset`.
    pub fn widget_at(&self, offset: usize) -> Option<&Rc<Widget>> {
        self.widgets()
            .find(|(span, _)| span.start <= offset && offset < span.end)
            .map(|(_, w)| w)
    }
}

/// Turns resolved sets into [`Decorations`], reusing widgets with equal specs.
#[derive(Debug)]
pub struct WidgetRenderer {
    bridge: NavigationBridge,
    open_modifier: OpenModifier,
    pool: HashMap<WidgetSpec, Vec<Rc<Widget>>>,
    built: usize,
}

impl WidgetRenderer {
    pub fn new(bridge: NavigationBridge, open_modifier: OpenModifier) -> Self {
        Self {
            bridge,
            open_modifier,
            pool: HashMap::new(),
            built: 0,
        }
    }

    pub fn open_modifier(&self) -> OpenModifier {
        self.open_modifier
    }

    /// Changing the modifier changes widget tooltips, so the pool is dropped.
    pub fn set_open_modifier(&mut self, open_modifier: OpenModifier) {
        if open_modifier != self.open_modifier {
            self.open_modifier = open_modifier;
            self.pool.clear();
        }
    }

    /// Number of widget elements built so far.
    pub fn built(&self) -> usize {
        self.built
    }

    pub fn render(&mut self, set: DecorationSet) -> Decorations {
        let mut previous = std::mem::take(&mut self.pool);
        let mut items = Vec::with_capacity(set.len());
        for edit in &set {
            let rendered = match &edit.kind {
                EditKind::Hide => Rendered::Hide,
                EditKind::Style(class) => Rendered::Style(*class),
                EditKind::ReplaceWidget(spec) => {
                    let widget = match previous.get_mut(spec).and_then(Vec::pop) {
                        Some(w) => w,
                        None => {
                            self.built += 1;
                            Rc::new(Widget::new(
                                spec.clone(),
                                self.bridge.clone(),
                                self.open_modifier,
                            ))
                        }
                    };
                    self.pool
                        .entry(spec.clone())
                        .or_default()
                        .push(widget.clone());
                    Rendered::Widget(widget)
                }
            };
            items.push(RenderedDecoration {
                span: edit.span,
                priority: edit.priority,
                rendered,
            });
        }
        // Keep pool order stable so repeated specs reuse in document order.
        for widgets in self.pool.values_mut() {
            widgets.reverse();
        }
        Decorations { set, items }
    }
}

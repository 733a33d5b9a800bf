pub mod decorate;
pub mod layout;
pub mod links;
pub mod navigation;
pub mod preview;
pub mod resolve;
pub mod schedule;
pub mod span;
pub mod tree;
pub mod widget;

// Re-export key types for easier usage
pub use decorate::{CandidateEdit, EditKind, Mode, RebuildInput, StyleClass};
pub use links::{LinkScanScope, ParsedLinks, WikiLinkMatch, find_wiki_links, parse_links};
pub use navigation::{LinkActivation, NavigationBridge};
pub use preview::{Change, LivePreview, PreviewSettings, build_decorations};
pub use resolve::{DecorationSet, resolve};
pub use span::Span;
pub use tree::{MarkdownTreeProvider, Node, NodeKind, NodeTreeProvider};
pub use widget::{
    Decorations, EventOutcome, Key, LinkWidget, Modifiers, OpenModifier, Phase, PointerKind,
    Widget, WidgetEvent, WidgetSpec,
};

use std::fmt;

use crate::span::Span;
use crate::widget::WidgetSpec;

/// Named style hooks. Hosts map class names to colours and fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleClass {
    /// Heading content, level 1 to 6.
    Heading(u8),
    Strong,
    Emphasis,
    InlineCode,
    CodeBlock,
    ListItem,
    Blockquote,
    Link,
}

impl StyleClass {
    pub fn class_name(self) -> &'static str {
        match self {
            StyleClass::Heading(1) => "cm-h1",
            StyleClass::Heading(2) => "cm-h2",
            StyleClass::Heading(3) => "cm-h3",
            StyleClass::Heading(4) => "cm-h4",
            StyleClass::Heading(5) => "cm-h5",
            StyleClass::Heading(_) => "cm-h6",
            StyleClass::Strong => "cm-strong",
            StyleClass::Emphasis => "cm-emphasis",
            StyleClass::InlineCode => "cm-inline-code",
            StyleClass::CodeBlock => "cm-code-block",
            StyleClass::ListItem => "cm-list-item",
            StyleClass::Blockquote => "cm-blockquote",
            StyleClass::Link => "cm-md-link",
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// What a candidate does to its span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditKind {
    Hide,
    Style(StyleClass),
    ReplaceWidget(WidgetSpec),
}

impl EditKind {
    /// Hide and ReplaceWidget both remove the raw text from view.
    pub fn conceals(&self) -> bool {
        !matches!(self, EditKind::Style(_))
    }

    pub fn default_priority(&self) -> i32 {
        if self.conceals() {
            CandidateEdit::CONCEAL_PRIORITY
        } else {
            CandidateEdit::STYLE_PRIORITY
        }
    }
}

/// A proposed decoration, produced fresh on every rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateEdit {
    pub span: Span,
    pub kind: EditKind,
    pub priority: i32,
}

impl CandidateEdit {
    pub const CONCEAL_PRIORITY: i32 = 10;
    pub const STYLE_PRIORITY: i32 = 1;

    pub fn new(span: Span, kind: EditKind) -> Self {
        let priority = kind.default_priority();
        Self {
            span,
            kind,
            priority,
        }
    }

    pub fn hide(span: Span) -> Self {
        Self::new(span, EditKind::Hide)
    }

    pub fn style(span: Span, class: StyleClass) -> Self {
        Self::new(span, EditKind::Style(class))
    }

    pub fn widget(span: Span, spec: WidgetSpec) -> Self {
        Self::new(span, EditKind::ReplaceWidget(spec))
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl fmt::Display for CandidateEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EditKind::Hide => write!(f, "hide {}", self.span),
            EditKind::Style(class) => write!(f, "style {} {class}", self.span),
            EditKind::ReplaceWidget(spec) => write!(f, "widget {} {spec}", self.span),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
}

/// Which modifier turns a click on an edit-mode link into navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenModifier {
    /// Either Ctrl or Cmd/Meta.
    #[default]
    CtrlOrMeta,
    Ctrl,
    Meta,
    /// Cmd/Meta on macOS, Ctrl elsewhere.
    Platform,
}

impl OpenModifier {
    pub fn is_held(self, m: Modifiers) -> bool {
        match self {
            OpenModifier::CtrlOrMeta => m.ctrl || m.meta,
            OpenModifier::Ctrl => m.ctrl,
            OpenModifier::Meta => m.meta,
            OpenModifier::Platform if cfg!(target_os = "macos") => m.meta,
            OpenModifier::Platform => m.ctrl,
        }
    }

    /// Tooltip hint shown on edit-mode link widgets.
    pub fn hint(self) -> &'static str {
        match self {
            OpenModifier::CtrlOrMeta => "Ctrl+Click (or Cmd+Click on Mac) to open",
            OpenModifier::Ctrl => "Ctrl+Click to open",
            OpenModifier::Meta => "Cmd+Click to open",
            OpenModifier::Platform if cfg!(target_os = "macos") => "Cmd+Click to open",
            OpenModifier::Platform => "Ctrl+Click to open",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Click,
}

/// Dispatch phase. Capture runs before the host's own handlers, bubble after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Capture,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    /// Activates preview links like Enter; edit links ignore it.
    Space,
    Char(char),
}

/// Input delivered to a widget by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetEvent {
    Pointer {
        kind: PointerKind,
        phase: Phase,
        modifiers: Modifiers,
    },
    Key {
        key: Key,
        modifiers: Modifiers,
    },
}

impl WidgetEvent {
    pub fn pointer(kind: PointerKind, phase: Phase, modifiers: Modifiers) -> Self {
        WidgetEvent::Pointer {
            kind,
            phase,
            modifiers,
        }
    }

    pub fn key(key: Key, modifiers: Modifiers) -> Self {
        WidgetEvent::Key { key, modifiers }
    }

    /// The events a single mouse click produces, in delivery order.
    pub fn click_sequence(modifiers: Modifiers) -> [WidgetEvent; 3] {
        [
            Self::pointer(PointerKind::Down, Phase::Capture, modifiers),
            Self::pointer(PointerKind::Click, Phase::Capture, modifiers),
            Self::pointer(PointerKind::Click, Phase::Bubble, modifiers),
        ]
    }
}

/// Whether a widget consumed an event. `PassThrough` leaves caret placement
/// to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOutcome {
    Intercepted,
    PassThrough,
}

impl EventOutcome {
    pub fn intercepted(self) -> bool {
        self == EventOutcome::Intercepted
    }
}

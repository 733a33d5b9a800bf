//! Per-instance bridge between link widgets and the host's navigation handler.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

/// What a link widget reports when activated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkActivation {
    pub target: String,
    pub heading: Option<String>,
}

type Handler = Box<dyn FnMut(&LinkActivation)>;

/// Shared cell holding the current navigation handler.
///
/// Widgets keep a clone of the bridge, not of the handler, so replacing the
/// handler takes effect for widgets that were built (and pooled) earlier.
#[derive(Clone, Default)]
pub struct NavigationBridge {
    handler: Rc<RefCell<Option<Handler>>>,
}

impl NavigationBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or replaces the handler. Ignored (with a warning) while the
    /// handler itself is running.
    pub fn set(&self, handler: impl FnMut(&LinkActivation) + 'static) {
        match self.handler.try_borrow_mut() {
            Ok(mut slot) => *slot = Some(Box::new(handler)),
            Err(_) => warn!("navigation handler replaced while running; keeping the current one"),
        }
    }

    pub fn is_set(&self) -> bool {
        self.handler.try_borrow().is_ok_and(|slot| slot.is_some())
    }

    /// Forwards an activation to the handler. Returns `false` when there is no
    /// handler or the call would re-enter it.
    pub fn activate(&self, activation: &LinkActivation) -> bool {
        let Ok(mut slot) = self.handler.try_borrow_mut() else {
            warn!(
                "re-entrant navigation to {:?} dropped",
                activation.target
            );
            return false;
        };
        match slot.as_mut() {
            Some(handler) => {
                debug!(
                    "navigating to {:?} heading {:?}",
                    activation.target, activation.heading
                );
                handler(activation);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for NavigationBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationBridge")
            .field("set", &self.is_set())
            .finish()
    }
}

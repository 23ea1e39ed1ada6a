//! Tab/view state: which of the two panels is active.

use serde::{Deserialize, Serialize};

/// One of the two generation panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Scales,
    Chords,
}

impl View {
    pub const ALL: [View; 2] = [View::Scales, View::Chords];

    /// Tab title.
    pub fn title(self) -> &'static str {
        match self {
            View::Scales => "Scales",
            View::Chords => "Chords",
        }
    }

    /// The other panel.
    pub fn other(self) -> View {
        match self {
            View::Scales => View::Chords,
            View::Chords => View::Scales,
        }
    }
}

/// Exactly one active view at any time.
///
/// The active view is a single value, so there is never a moment with two
/// or zero panels active. Tabs are styled from it on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    active: View,
}

impl ViewState {
    pub fn new(initial: View) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn is_active(&self, view: View) -> bool {
        self.active == view
    }

    /// Activates `view`. Returns true if the active view changed; switching
    /// to the active view is a no-op.
    pub fn switch_to(&mut self, view: View) -> bool {
        if self.active == view {
            return false;
        }
        tracing::debug!("Switching view {:?} -> {:?}", self.active, view);
        self.active = view;
        true
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(View::default())
    }
}

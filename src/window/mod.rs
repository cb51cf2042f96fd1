pub mod events;

mod window_manager;

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::{DockSlot, PositionDescriptor, PositionOptions, TargetRect};

pub use events::{SubscriptionId, WindowEvent};
pub use window_manager::WindowManager;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for WindowId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Who registered a panel. Compared by value, so every extension with the
/// same name is the same owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum Owner {
    Host,
    Extension(String),
}

impl Owner {
    pub fn extension(name: impl Into<String>) -> Self {
        Self::Extension(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("a window with id {0} is already registered")]
    DuplicateId(WindowId),
}

/// What a caller asks for when opening a panel.
///
/// `C` is the caller's content handle and `S` its per-panel state; the
/// manager stores both but never looks inside.
#[derive(Debug, Clone)]
pub struct WindowOptions<C, S = ()> {
    pub(crate) id: Option<WindowId>,
    pub(crate) slot: Option<DockSlot>,
    pub(crate) position: Option<PositionOptions>,
    pub(crate) parent_id: Option<WindowId>,
    pub(crate) target: Option<TargetRect>,
    pub(crate) content: C,
    pub(crate) state: S,
}

impl<C, S: Default> WindowOptions<C, S> {
    pub fn new(content: C) -> Self {
        Self {
            id: None,
            slot: None,
            position: None,
            parent_id: None,
            target: None,
            content,
            state: S::default(),
        }
    }
}

impl<C, S> WindowOptions<C, S> {
    #[must_use]
    pub fn id(mut self, id: impl Into<WindowId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Defaults to [`DockSlot::Detached`].
    #[must_use]
    pub fn slot(mut self, slot: DockSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Initial position. Only detached panels honour it; docked slots
    /// always open at their default.
    #[must_use]
    pub fn position(mut self, position: PositionOptions) -> Self {
        self.position = Some(position);
        self
    }

    /// Open as a child of `parent`, placed right next to it.
    #[must_use]
    pub fn parent(mut self, parent: impl Into<WindowId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Viewport measured by the caller at open time; used to resolve a
    /// parent's percent-based position.
    #[must_use]
    pub fn target(mut self, target: TargetRect) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn state(mut self, state: S) -> Self {
        self.state = state;
        self
    }
}

/// A registered panel.
///
/// Layout fields are owned by the manager and read-only from outside;
/// `content` and `state` belong to the caller.
#[derive(Debug, Clone)]
pub struct WindowEntry<C, S = ()> {
    id: WindowId,
    owner: Owner,
    slot: DockSlot,
    home_slot: DockSlot,
    position: PositionDescriptor,
    home_position: Option<PositionDescriptor>,
    parent_id: Option<WindowId>,
    shifted: bool,
    pub content: C,
    pub state: S,
}

impl<C, S> WindowEntry<C, S> {
    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn slot(&self) -> DockSlot {
        self.slot
    }

    /// Slot the panel was opened in; `pin` returns it there.
    pub fn home_slot(&self) -> DockSlot {
        self.home_slot
    }

    pub fn position(&self) -> &PositionDescriptor {
        &self.position
    }

    pub fn parent_id(&self) -> Option<&WindowId> {
        self.parent_id.as_ref()
    }

    /// Whether this `DynamicLeft` panel is pushed right by a `Static` one.
    pub fn is_shifted(&self) -> bool {
        self.shifted
    }
}

use super::{WindowEntry, WindowId};
use crate::layout::{DockSlot, PositionDescriptor};

/// Handle returned by [`super::WindowManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

/// Change notifications pushed to subscribers.
#[derive(Debug, Clone)]
pub enum WindowEvent<C, S = ()> {
    /// Carries only the id. The entry is already registered when this is
    /// delivered, so listeners read it with `get`.
    Added(WindowId),
    /// Carries the entry as it was when it left the manager. Any cache
    /// write for it has already happened.
    Removed(WindowEntry<C, S>),
    PositionChanged {
        id: WindowId,
        position: PositionDescriptor,
    },
    SlotChanged {
        id: WindowId,
        previous: DockSlot,
        slot: DockSlot,
    },
    BroughtToFront(WindowId),
}

impl<C, S> WindowEvent<C, S> {
    pub fn id(&self) -> &WindowId {
        match self {
            WindowEvent::Added(id) | WindowEvent::BroughtToFront(id) => id,
            WindowEvent::Removed(entry) => entry.id(),
            WindowEvent::PositionChanged { id, .. } | WindowEvent::SlotChanged { id, .. } => id,
        }
    }
}

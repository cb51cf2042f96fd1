//! Dock slots: default placement and exclusivity.
//!
//! This module only reports what has to change; evicting a panel is the
//! window manager's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Length, PositionDescriptor, PositionOptions, normalize};
use crate::config::LayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DockSlot {
    /// Left edge, full priority. Pushes `DynamicLeft` to the right.
    Static,
    DynamicLeft,
    DynamicRight,
    /// Free floating; any number of panels.
    #[default]
    Detached,
}

impl DockSlot {
    pub const ALL: [DockSlot; 4] = [
        DockSlot::Static,
        DockSlot::DynamicLeft,
        DockSlot::DynamicRight,
        DockSlot::Detached,
    ];

    /// At most one panel may occupy an exclusive slot.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, DockSlot::Detached)
    }

    pub fn label(self) -> &'static str {
        match self {
            DockSlot::Static => "static",
            DockSlot::DynamicLeft => "dynamic-left",
            DockSlot::DynamicRight => "dynamic-right",
            DockSlot::Detached => "detached",
        }
    }
}

impl fmt::Display for DockSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Default descriptor of `slot`.
///
/// `DynamicLeft` is shifted right by the secondary offset while a `Static`
/// panel is open.
pub fn default_position_for_slot(
    slot: DockSlot,
    is_static_occupied: bool,
    config: &LayoutConfig,
) -> PositionDescriptor {
    let size = Length::Px(config.fallback_size);
    let options = match slot {
        DockSlot::Static => PositionOptions::new().left(0).top(0).width(size),
        DockSlot::DynamicLeft => {
            let left = if is_static_occupied {
                config.secondary_offset
            } else {
                0.0
            };
            PositionOptions::new().left(left).top(0).width(size)
        }
        DockSlot::DynamicRight => PositionOptions::new().right(0).top(0).width(size),
        DockSlot::Detached => {
            let (left, top) = config.detached_anchor;
            PositionOptions::new().left(left).top(top).width(size)
        }
    };
    normalize(&options, config)
}

/// Which current occupant, if any, has to leave before a panel can take
/// `new_slot`. `Detached` never evicts.
pub fn resolve_slot_conflict<Id, I>(new_slot: DockSlot, existing: I) -> Option<Id>
where
    I: IntoIterator<Item = (Id, DockSlot)>,
{
    if !new_slot.is_exclusive() {
        return None;
    }
    existing
        .into_iter()
        .find_map(|(id, slot)| (slot == new_slot).then_some(id))
}

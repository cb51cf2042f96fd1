use ratatui::prelude::Direction;

use super::position::{anchored_size, in_unit_of};
use super::{
    AXES, Length, PositionDescriptor, PositionField, PositionOptions, TargetRect, axis_fields,
    measured, resolve_length, resolve_rect,
};
use crate::config::{ClipMargins, LayoutConfig};

/// Differences below this are treated as "already in range" so percent
/// round trips do not rewrite a field twice.
const CLIP_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Allowed range of an edge offset on an axis of length `extent`.
fn edge_bounds(field: PositionField, extent: f64, margins: &ClipMargins) -> (f64, f64) {
    // near: how far the edge may leave the viewport
    // far: how much of the panel has to stay visible on the opposite side
    let (near, far) = match field {
        PositionField::Left => (margins.left, margins.right),
        PositionField::Right => (margins.right, margins.left),
        PositionField::Top => (margins.top, margins.bottom),
        _ => (margins.bottom, margins.top),
    };
    (0.0 - near, extent - far)
}

fn clip_axis(
    position: &mut PositionDescriptor,
    axis: Direction,
    target: &TargetRect,
    config: &LayoutConfig,
    static_shift: bool,
) {
    let fields = axis_fields(axis);
    let extent = target.extent(axis);
    let margins = &config.clip_margins;
    let far_only = resolve_length(position.get(fields.near), fields.near, Some(target)).is_none();
    // space between the anchored edges and the viewport side the panel grows towards
    let mut room = extent;

    for field in [fields.near, fields.far] {
        let value = position.get(field);
        let Some(px) = resolve_length(value, field, Some(target)) else {
            continue;
        };
        let (mut lower, mut upper) = edge_bounds(field, extent, margins);
        if static_shift && field == PositionField::Left {
            lower = lower.max(config.secondary_offset);
        }
        if field == fields.far && far_only {
            // the panel's near side may leave by the near margin only
            let overhang = -edge_bounds(fields.near, extent, margins).0;
            let size = anchored_size(position, axis, Some(target), config);
            upper = upper.min((extent + overhang - size).floor()).max(lower);
            room += overhang;
        }
        // max/min rather than clamp: a tiny target can invert the range
        let bounded = px.max(lower).min(upper);
        if (bounded - px).abs() > CLIP_EPSILON {
            position.set(field, in_unit_of(value, bounded, field, Some(target)));
        }
        room -= bounded;
    }

    let remaining = room.max(0.0).round();
    let explicit = resolve_length(position.get(fields.max), fields.max, Some(target));
    if !explicit.is_some_and(|max| max <= remaining + CLIP_EPSILON) {
        position.set(fields.max, Length::Px(remaining));
    }
}

/// Keep a panel reachable inside `target`.
///
/// Each edge may leave the viewport by at most its margin, and enough of
/// the panel stays visible on the opposite side to grab it again. A panel
/// held only by its right or bottom edge keeps its size: that edge is
/// bounded so the panel's left or top side leaves by at most its margin.
/// `max_width`/`max_height` are capped to the space left between the
/// anchored edges and the viewport side the panel grows towards. A `DynamicLeft` panel that
/// is shifted for an open `Static` panel (`static_shift`) never moves left
/// of the secondary offset, which also caps its width to the space right
/// of the static panel.
///
/// Returns the position unchanged when the target is not measured.
pub fn clip_to_target(
    position: &PositionDescriptor,
    target: Option<&TargetRect>,
    config: &LayoutConfig,
    static_shift: bool,
) -> PositionDescriptor {
    let Some(target) = measured(target) else {
        return *position;
    };
    let mut clipped = *position;
    for axis in AXES {
        clip_axis(&mut clipped, axis, target, config, static_shift);
    }
    clipped
}

/// Pick the corner of a `width` x `height` panel to pin at `(x, y)` so the
/// panel stays inside the target. Coordinates are target-local.
pub fn fit_corner_alignment(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    target: Option<&TargetRect>,
) -> Alignment {
    let Some(target) = measured(target) else {
        return Alignment::TopLeft;
    };
    let overflow_x = x + width > target.width;
    let overflow_y = y + height > target.height;
    match (overflow_x, overflow_y) {
        (false, false) => Alignment::TopLeft,
        (true, false) => Alignment::TopRight,
        (false, true) => Alignment::BottomLeft,
        (true, true) => Alignment::BottomRight,
    }
}

/// Options that put the `alignment` corner of a panel at `(x, y)`.
pub fn position_for_alignment(
    x: f64,
    y: f64,
    alignment: Alignment,
    target: Option<&TargetRect>,
) -> PositionOptions {
    let Some(target) = measured(target) else {
        return PositionOptions::new().left(x).top(y);
    };
    let right = target.width - x;
    let bottom = target.height - y;
    match alignment {
        Alignment::TopLeft => PositionOptions::new().left(x).top(y),
        Alignment::TopRight => PositionOptions::new().right(right).top(y),
        Alignment::BottomLeft => PositionOptions::new().left(x).bottom(bottom),
        Alignment::BottomRight => PositionOptions::new().right(right).bottom(bottom),
    }
}

/// Place a panel of known size at a point, e.g. a context menu at the
/// cursor, flipping it away from edges it would overflow.
pub fn fitted_position(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    target: Option<&TargetRect>,
) -> PositionOptions {
    let alignment = fit_corner_alignment(x, y, width, height, target);
    position_for_alignment(x, y, alignment, target)
        .width(width)
        .height(height)
}

/// Place `child` immediately to the right of its parent's resolved box.
///
/// The parent's min/max limits apply before its width is measured. The
/// child's far edges are cleared so its own size is kept. When the parent
/// cannot be resolved (unmeasured target and non-pixel parent) the child
/// is left as it is.
pub fn apply_parent_anchor(
    child: &mut PositionOptions,
    target: Option<&TargetRect>,
    parent: &PositionDescriptor,
    config: &LayoutConfig,
) {
    let Some(rect) = resolve_rect(parent, target, config) else {
        return;
    };
    child.left = Some(Length::Px(rect.right() + config.parent_gap));
    child.top = Some(Length::Px(rect.y));
    child.right = Some(Length::Unset);
    child.bottom = Some(Length::Unset);
}

//! Conversion between symbolic position descriptors and pixel values.
//!
//! Everything here is total: malformed or unresolvable input degrades to
//! `None` or a sentinel instead of failing, since a panel must stay
//! placeable no matter what the caller hands in.

use ratatui::prelude::Direction;

use super::{
    AXES, Length, PanelRect, PositionDescriptor, PositionField, PositionOptions, TargetRect,
    axis_fields, measured,
};
use crate::config::LayoutConfig;

/// Resolve a single field to pixels.
///
/// Pixel values are rounded to the nearest integer. Percentages refer to
/// the target's width for horizontal fields and its height for vertical
/// ones, so they need a measured target. Sentinels never resolve.
pub fn resolve_length(
    value: Length,
    field: PositionField,
    target: Option<&TargetRect>,
) -> Option<f64> {
    match value {
        Length::Px(px) if px.is_finite() => Some(px.round()),
        Length::Percent(pct) if pct.is_finite() => {
            measured(target).map(|t| t.extent(field.axis()) * pct / 100.0)
        }
        _ => None,
    }
}

/// Like [`resolve_length`] but starting from raw CSS-style text.
pub fn resolve_length_str(
    raw: &str,
    field: PositionField,
    target: Option<&TargetRect>,
) -> Option<f64> {
    Length::parse(raw).and_then(|value| resolve_length(value, field, target))
}

/// Normalize caller options into a descriptor.
///
/// Per axis: when both edges are numeric the size becomes `auto`; when
/// neither is, the near edge gets the default offset; a size that cannot
/// be derived falls back to the configured fallback size.
pub fn normalize(raw: &PositionOptions, config: &LayoutConfig) -> PositionDescriptor {
    normalize_descriptor(PositionDescriptor::from(raw), config)
}

pub(crate) fn normalize_descriptor(
    mut descriptor: PositionDescriptor,
    config: &LayoutConfig,
) -> PositionDescriptor {
    for axis in AXES {
        let fields = axis_fields(axis);
        let near = descriptor.get(fields.near).is_numeric();
        let far = descriptor.get(fields.far).is_numeric();
        if near && far {
            descriptor.set(fields.size, Length::Auto);
            continue;
        }
        if !near && !far {
            descriptor.set(fields.near, Length::Px(config.default_offset));
        }
        if !descriptor.get(fields.size).is_numeric() {
            descriptor.set(fields.size, Length::Px(config.fallback_size));
        }
    }
    descriptor
}

/// Express `px` in the unit kind of `unit`.
///
/// Percent fields stay percentages when the target is measured; anything
/// else becomes pixels.
pub(crate) fn in_unit_of(
    unit: Length,
    px: f64,
    field: PositionField,
    target: Option<&TargetRect>,
) -> Length {
    match (unit, measured(target)) {
        (Length::Percent(_), Some(t)) => Length::Percent(px * 100.0 / t.extent(field.axis())),
        _ => Length::Px(px),
    }
}

fn convert_update(
    previous: Length,
    update: Length,
    field: PositionField,
    target: Option<&TargetRect>,
) -> Length {
    if measured(target).is_none() {
        return update;
    }
    match (previous, update) {
        // unrounded, so a percent field survives a pixel round trip
        (Length::Percent(_), Length::Px(px)) if px.is_finite() => {
            in_unit_of(previous, px, field, target)
        }
        (Length::Px(_), Length::Percent(_)) => resolve_length(update, field, target)
            .map_or(update, |px| in_unit_of(previous, px, field, target)),
        _ => update,
    }
}

/// Apply `update` on top of `previous`, keeping each field's unit kind.
///
/// Fields the update does not mention are kept as they were. A supplied
/// value is translated into the unit `previous` used for that field, so a
/// percent-positioned panel stays percent-positioned while being dragged.
pub fn reapply_update(
    previous: &PositionDescriptor,
    update: &PositionOptions,
    target: Option<&TargetRect>,
    config: &LayoutConfig,
) -> PositionDescriptor {
    let mut next = *previous;
    for field in PositionField::ALL {
        let Some(value) = update.get(field) else {
            continue;
        };
        next.set(field, convert_update(previous.get(field), value, field, target));
    }
    normalize_descriptor(next, config)
}

/// Build an update that moves every numeric edge of `position` by a pixel
/// delta. Far edges move in the opposite direction. Percent edges stay
/// percentages when the target is measured.
pub fn translate(
    position: &PositionDescriptor,
    dx: f64,
    dy: f64,
    target: Option<&TargetRect>,
) -> PositionOptions {
    let mut update = PositionOptions::default();
    let moves = [
        (PositionField::Left, dx),
        (PositionField::Right, -dx),
        (PositionField::Top, dy),
        (PositionField::Bottom, -dy),
    ];
    for (field, delta) in moves {
        let moved = match (position.get(field), measured(target)) {
            (Length::Percent(pct), Some(t)) if pct.is_finite() => {
                Length::Percent(pct + delta * 100.0 / t.extent(field.axis()))
            }
            (value, _) => match resolve_length(value, field, target) {
                Some(px) => Length::Px(px + delta),
                None => continue,
            },
        };
        update.set(field, Some(moved));
    }
    update
}

/// Apply the max and then the min limit of `axis` to `size`.
fn limit_size(
    mut size: f64,
    position: &PositionDescriptor,
    axis: Direction,
    target: Option<&TargetRect>,
) -> f64 {
    let fields = axis_fields(axis);
    if let Some(max) = resolve_length(position.get(fields.max), fields.max, target) {
        size = size.min(max);
    }
    // min wins over max, as in CSS
    if let Some(min) = resolve_length(position.get(fields.min), fields.min, target) {
        size = size.max(min);
    }
    size
}

/// Size of a panel held by a single edge of `axis`: its own size or the
/// fallback, within its limits.
pub(crate) fn anchored_size(
    position: &PositionDescriptor,
    axis: Direction,
    target: Option<&TargetRect>,
    config: &LayoutConfig,
) -> f64 {
    let fields = axis_fields(axis);
    let size = resolve_length(position.get(fields.size), fields.size, target)
        .unwrap_or(config.fallback_size);
    limit_size(size, position, axis, target)
}

fn resolve_axis(
    position: &PositionDescriptor,
    axis: Direction,
    target: Option<&TargetRect>,
    config: &LayoutConfig,
) -> Option<(f64, f64)> {
    let fields = axis_fields(axis);
    let extent = measured(target).map(|t| t.extent(axis));
    let resolve = |field| resolve_length(position.get(field), field, target);
    let near = resolve(fields.near);
    let far = resolve(fields.far);
    let near_set = position.get(fields.near).is_numeric();
    let far_set = position.get(fields.far).is_numeric();
    let explicit_size = resolve(fields.size);
    if explicit_size.is_none() && position.get(fields.size).is_numeric() {
        return None;
    }

    let size = match (explicit_size, near, far, extent) {
        (Some(size), ..) => size,
        (None, Some(near), Some(far), Some(extent)) => (extent - near - far).max(0.0),
        _ => config.fallback_size,
    };
    let size = limit_size(size, position, axis, target);

    let origin = match (near, far) {
        (Some(near), _) => near,
        (None, Some(far)) if !near_set => extent? - far - size,
        (None, None) if !near_set && !far_set => config.default_offset,
        // an edge is set but cannot be resolved without the target
        _ => return None,
    };
    Some((origin, size))
}

/// Resolve a descriptor into a pixel box relative to the target origin.
///
/// Without a measured target only pixel-valued, near-anchored axes can be
/// resolved; anything else yields `None`.
pub fn resolve_rect(
    position: &PositionDescriptor,
    target: Option<&TargetRect>,
    config: &LayoutConfig,
) -> Option<PanelRect> {
    let (x, width) = resolve_axis(position, Direction::Horizontal, target, config)?;
    let (y, height) = resolve_axis(position, Direction::Vertical, target, config)?;
    Some(PanelRect {
        x,
        y,
        width,
        height,
    })
}

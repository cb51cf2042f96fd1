//! Shared crate-wide constants.
//!
//! All values are in CSS pixels of the target viewport. They are the
//! defaults of [`crate::config::LayoutConfig`]; callers that need other
//! values construct a config instead of touching these.

/// Offset injected on an axis when a position sets neither of its edges,
/// so a panel always has somewhere to go.
pub const DEFAULT_OFFSET: f64 = 200.0;

/// Width/height used when a descriptor sets neither a size nor an opposing
/// pair of edges the size could be derived from.
pub const FALLBACK_SIZE: f64 = 320.0;

/// Left offset of a `DYNAMIC_LEFT` panel while a `STATIC` panel is open.
///
/// Matches the static panel's default width so the two sit side by side.
pub const SECONDARY_OFFSET: f64 = 320.0;

/// Anchor of a detached panel added without explicit coordinates.
pub const DETACHED_ANCHOR: (f64, f64) = (200.0, 200.0);

/// Gap between a parent panel's right edge and its child.
pub const PARENT_GAP: f64 = 2.0;

/// How far a panel's top edge may leave the viewport. Zero keeps the
/// header grabbable.
pub const CLIP_MARGIN_TOP: f64 = 0.0;

/// Minimum number of pixels that stay visible when a panel is dragged
/// towards the right edge.
pub const CLIP_MARGIN_RIGHT: f64 = 64.0;

/// Minimum number of pixels that stay visible when a panel is dragged
/// towards the bottom edge.
pub const CLIP_MARGIN_BOTTOM: f64 = 32.0;

/// How far a panel's left edge may leave the viewport.
pub const CLIP_MARGIN_LEFT: f64 = 64.0;

/// Lines retained by the in-memory log buffer used by the demo binary.
pub const LOG_BUFFER_LINES: usize = 2000;
